//! Pointer-driven tooltip state for hosts that do their own hit dispatch.
//!
//! Pointer-enter on a shape shows the shape's value and thickens its
//! stroke; pointer-move keeps the box tracking the pointer at a fixed
//! offset; pointer-leave reverts both.

/// Horizontal offset from the pointer to the tooltip box.
pub const POINTER_OFFSET_X: f64 = 10.0;
/// Vertical offset from the pointer to the tooltip box.
pub const POINTER_OFFSET_Y: f64 = -10.0;
/// Stroke width applied to the hovered shape.
pub const HOVER_STROKE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    visible: bool,
    x: f64,
    y: f64,
    text: String,
}

impl Tooltip {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn pointer_enter(&mut self, value: f64) {
        self.visible = true;
        self.text = format_value(value);
    }

    /// No-op unless a shape is hovered.
    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) {
        if self.visible {
            self.x = page_x + POINTER_OFFSET_X;
            self.y = page_y + POINTER_OFFSET_Y;
        }
    }

    pub fn pointer_leave(&mut self) {
        *self = Self::hidden();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.visible.then_some((self.x, self.y))
    }

    pub fn text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

pub fn format_value(value: f64) -> String {
    format!("Value: {}", crate::svg::fmt(value))
}
