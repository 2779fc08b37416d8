//! Layout and SVG rendering for chordial diagrams.
//!
//! Each dataset kind has a pure layout pass producing a serializable
//! geometry model, a reconciliation pass diffing it against the previous
//! render, and an SVG writer that turns both into markup with declarative
//! transitions. [`DiagramRenderer`] ties the three together and retains the
//! previous layout between calls.

#![forbid(unsafe_code)]

pub mod bars;
pub mod chord;
pub mod diff;
pub mod model;
pub mod palette;
pub mod renderer;
pub mod sankey;
pub mod scale;
pub mod svg;
pub mod tooltip;

use chordial_core::{Dataset, DiagramKind};
use serde::{Deserialize, Serialize};

pub use diff::{RenderPlan, ShapeKey, Transition, reconcile, shape_keys};
pub use model::DiagramLayout;
pub use renderer::{DiagramRenderer, RenderOutput};
pub use sankey::{NodeAlign, SankeyOptions};
pub use svg::{SvgRenderOptions, render_diagram};
pub use tooltip::Tooltip;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dataset(#[from] chordial_core::Error),
    #[error("surface {width}x{height} leaves no drawable area")]
    DegenerateSurface { width: f64, height: f64 },
    #[error("{message}")]
    ZeroFlow { message: String },
    #[error("{message}")]
    CircularFlow { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Drawing area in CSS pixels. Layouts fill it edge to edge; the SVG root
/// scales to its container with `max-width` pinned at this width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(Error::DegenerateSurface { width, height });
        }
        Ok(Self { width, height })
    }

    /// Reference surface for each diagram kind.
    pub fn default_for(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Chord => Self {
                width: 800.0,
                height: 800.0,
            },
            DiagramKind::Sankey => Self {
                width: 700.0,
                height: 300.0,
            },
            DiagramKind::Bars => Self {
                width: 800.0,
                height: 400.0,
            },
        }
    }
}

/// Validate a dataset and lay it out on `surface`.
pub fn layout_dataset(dataset: &Dataset, surface: Surface) -> Result<DiagramLayout> {
    tracing::debug!(kind = ?dataset.kind(), width = surface.width, height = surface.height, "layout");
    match dataset {
        Dataset::Matrix(matrix) => {
            let flow = matrix.validate()?;
            Ok(DiagramLayout::Chord(chord::layout_chord(&flow, surface)?))
        }
        Dataset::Graph(graph) => {
            let flow = graph.resolve()?;
            Ok(DiagramLayout::Sankey(sankey::layout_sankey(
                &flow,
                surface,
                &SankeyOptions::default(),
            )?))
        }
        Dataset::Series(series) => {
            let values = series.validate()?;
            Ok(DiagramLayout::Bars(bars::layout_bars(&values, surface)?))
        }
    }
}
