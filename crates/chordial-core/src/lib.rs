#![forbid(unsafe_code)]

//! Dataset model + normalization for chordial diagrams (headless).
//!
//! A dataset is a plain in-memory value: a square flow matrix, a named
//! node/link graph, or a value series. Normalization validates the shape and
//! rewrites named link endpoints to node indices before any layout runs, so
//! downstream geometry never sees a dangling reference.

pub mod dataset;
pub mod error;
pub mod normalize;

pub use dataset::{
    Dataset, DiagramKind, GraphDataset, LinkSpec, MatrixDataset, NodeRef, NodeSpec, SeriesDataset,
};
pub use error::{Error, Result};
pub use normalize::{FlowGraph, FlowMatrix, GraphLink, GraphNode, ValueSeries};
