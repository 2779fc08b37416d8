//! Stateful renderer retaining the previous layout between calls, so each
//! render reconciles against its predecessor the way a live view would.

use crate::diff::{RenderPlan, reconcile};
use crate::model::DiagramLayout;
use crate::svg::{SvgRenderOptions, render_diagram};
use crate::{Result, Surface, layout_dataset};
use chordial_core::Dataset;

/// One render: the markup, the reconciliation plan behind it, and the
/// layout it drew.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub svg: String,
    pub plan: RenderPlan,
    pub layout: DiagramLayout,
}

#[derive(Debug, Default)]
pub struct DiagramRenderer {
    options: SvgRenderOptions,
    previous: Option<DiagramLayout>,
}

impl DiagramRenderer {
    pub fn new(options: SvgRenderOptions) -> Self {
        Self {
            options,
            previous: None,
        }
    }

    /// Lay out `dataset`, diff against the previous render, and emit SVG.
    /// The layout becomes the baseline for the next call.
    pub fn render(&mut self, dataset: &Dataset, surface: Surface) -> Result<RenderOutput> {
        let layout = layout_dataset(dataset, surface)?;
        let plan = reconcile(self.previous.as_ref(), &layout);
        tracing::debug!(
            enter = plan.enter.len(),
            update = plan.update.len(),
            exit = plan.exit.len(),
            "reconciled"
        );
        let svg = render_diagram(&layout, self.previous.as_ref(), &plan, &self.options);
        self.previous = Some(layout.clone());
        Ok(RenderOutput { svg, plan, layout })
    }

    /// Drop the retained layout; the next render enters everything again.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn previous_layout(&self) -> Option<&DiagramLayout> {
        self.previous.as_ref()
    }
}
