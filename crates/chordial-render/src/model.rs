use chordial_core::DiagramKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Where a radial group label sits, derived from the group's mid-angle.
///
/// The label rotates to the mid-angle and translates past the outer radius;
/// when the mid-angle passes π it mirrors (extra 180° plus `end` anchoring)
/// so lower-hemisphere labels stay upright.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordLabelPlacement {
    pub rotate_deg: f64,
    pub translate: f64,
    pub mirrored: bool,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordGroupLayout {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Row total for the group's category.
    pub value: f64,
    pub label: String,
}

impl ChordGroupLayout {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn label_placement(&self, outer_radius: f64) -> ChordLabelPlacement {
        let mid = self.mid_angle();
        let mirrored = mid > std::f64::consts::PI;
        ChordLabelPlacement {
            rotate_deg: mid.to_degrees() - 90.0,
            translate: outer_radius + 5.0,
            mirrored,
            anchor: if mirrored {
                TextAnchor::End
            } else {
                TextAnchor::Start
            },
        }
    }
}

/// One side of a ribbon: the angular slice group `index` devotes to its flow
/// toward group `subindex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSubgroupLayout {
    pub index: usize,
    pub subindex: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordRibbonLayout {
    pub source: ChordSubgroupLayout,
    pub target: ChordSubgroupLayout,
}

impl ChordRibbonLayout {
    /// The value a hover tooltip reports for this ribbon.
    pub fn value(&self) -> f64 {
        self.source.value
    }

    pub fn is_self_loop(&self) -> bool {
        self.source.index == self.target.index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDiagramLayout {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub groups: Vec<ChordGroupLayout>,
    pub ribbons: Vec<ChordRibbonLayout>,
    /// Origin-centered: the viewport places (0,0) at the diagram center.
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNodeLayout {
    pub index: usize,
    pub name: String,
    /// Larger of incoming and outgoing flow sums.
    pub value: f64,
    pub layer: usize,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLinkLayout {
    pub index: usize,
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub width: f64,
    /// Vertical midline of the link where it leaves the source node.
    pub y0: f64,
    /// Vertical midline of the link where it enters the target node.
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyDiagramLayout {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_padding: f64,
    pub nodes: Vec<SankeyNodeLayout>,
    pub links: Vec<SankeyLinkLayout>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTickLayout {
    /// Position along the axis, in surface coordinates.
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartLayout {
    pub width: f64,
    pub height: f64,
    pub bars: Vec<BarLayout>,
    pub x_ticks: Vec<AxisTickLayout>,
    pub y_ticks: Vec<AxisTickLayout>,
    /// y coordinate of the bottom axis line (the bars' baseline).
    pub baseline_y: f64,
    /// x coordinate of the left axis line.
    pub axis_x: f64,
    /// Right end of the bottom axis line.
    pub axis_right: f64,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiagramLayout {
    Chord(ChordDiagramLayout),
    Sankey(SankeyDiagramLayout),
    Bars(BarChartLayout),
}

impl DiagramLayout {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Chord(_) => DiagramKind::Chord,
            Self::Sankey(_) => DiagramKind::Sankey,
            Self::Bars(_) => DiagramKind::Bars,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Chord(l) => l.bounds,
            Self::Sankey(l) => l.bounds,
            Self::Bars(l) => l.bounds,
        }
    }
}
