//! Umbrella crate re-exporting the dataset model and, with the default
//! `render` feature, the layout and SVG pipeline.
//!
//! ```
//! use chordial::{Dataset, render};
//!
//! let dataset = Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]);
//! let svg = render::render_dataset_svg(&dataset, None).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

#![forbid(unsafe_code)]

pub use chordial_core::{
    Dataset, DiagramKind, Error as DatasetError, FlowGraph, FlowMatrix, GraphDataset, GraphLink,
    GraphNode, LinkSpec, MatrixDataset, NodeRef, NodeSpec, SeriesDataset, ValueSeries,
};

#[cfg(feature = "render")]
pub mod render {
    pub use chordial_render::{
        DiagramLayout, DiagramRenderer, Error, NodeAlign, RenderOutput, RenderPlan, Result,
        SankeyOptions, ShapeKey, Surface, SvgRenderOptions, Tooltip, Transition, layout_dataset,
        reconcile, render_diagram, shape_keys,
    };
    pub use chordial_render::{bars, chord, diff, model, palette, sankey, scale, tooltip};

    use chordial_core::Dataset;

    /// A usable SVG/CSS identifier derived from `raw`: ASCII alphanumerics,
    /// `-` and `_` pass through, everything else becomes `-`, and a leading
    /// digit gains a `d` prefix. Empty input falls back to `"diagram"`.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut id: String = raw
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '-'
                }
            })
            .collect();
        if id.is_empty() {
            id = "diagram".to_string();
        }
        if id.starts_with(|ch: char| ch.is_ascii_digit()) {
            id.insert(0, 'd');
        }
        id
    }

    /// One-shot render on the kind's reference surface. `diagram_id` is
    /// sanitized before use; `None` keeps the kind's default id.
    pub fn render_dataset_svg(dataset: &Dataset, diagram_id: Option<&str>) -> Result<String> {
        let options = SvgRenderOptions {
            diagram_id: diagram_id.map(sanitize_svg_id),
            ..Default::default()
        };
        let mut renderer = DiagramRenderer::new(options);
        let surface = Surface::default_for(dataset.kind());
        Ok(renderer.render(dataset, surface)?.svg)
    }
}
