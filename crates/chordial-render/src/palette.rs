//! Categorical colors keyed by stable index, plus the darken helper used
//! for arc and hover strokes.

/// The 10-color categorical scheme; index `i` always maps to the same color.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn category_color(index: usize) -> &'static str {
    CATEGORY10[index % CATEGORY10.len()]
}

/// Two-stop linear gradient definition for chord group arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub id: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

/// Even-indexed groups take the blue gradient, odd-indexed the orange one.
pub const GROUP_GRADIENTS: [Gradient; 2] = [
    Gradient {
        id: "group-gradient-even",
        from: "#1f77b4",
        to: "#aec7e8",
    },
    Gradient {
        id: "group-gradient-odd",
        from: "#ff7f0e",
        to: "#ffbb78",
    },
];

pub fn group_gradient(index: usize) -> &'static Gradient {
    &GROUP_GRADIENTS[index % 2]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// One step darker (each channel scaled by 0.7).
    pub fn darker(self) -> Self {
        let scale = |c: u8| ((c as f64) * 0.7).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Darkened stroke for the category color at `index`.
pub fn category_stroke(index: usize) -> String {
    match Rgb::parse_hex(category_color(index)) {
        Some(rgb) => rgb.darker().to_css(),
        None => category_color(index).to_string(),
    }
}
