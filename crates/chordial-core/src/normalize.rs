use crate::dataset::{GraphDataset, MatrixDataset, NodeRef, SeriesDataset};
use crate::{Error, Result};
use indexmap::IndexMap;

/// A validated square flow matrix. Row count defines the group count.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMatrix {
    rows: Vec<Vec<f64>>,
    row_totals: Vec<f64>,
    total: f64,
}

impl FlowMatrix {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_totals(&self) -> &[f64] {
        &self.row_totals
    }

    /// Grand total of all cells.
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl MatrixDataset {
    /// Validates shape (non-empty, square, finite, non-negative) and caches
    /// row totals for the chord layout.
    pub fn validate(&self) -> Result<FlowMatrix> {
        let n = self.rows.len();
        if n == 0 {
            return Err(Error::EmptyDataset {
                message: "matrix has no rows".to_string(),
            });
        }

        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::RaggedMatrix {
                    row: i,
                    expected: n,
                    found: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(Error::NonFiniteCell { row: i, col: j });
                }
                if v < 0.0 {
                    return Err(Error::NegativeCell {
                        row: i,
                        col: j,
                        value: v,
                    });
                }
            }
        }

        let row_totals: Vec<f64> = self.rows.iter().map(|row| row.iter().sum()).collect();
        let total = row_totals.iter().sum();

        Ok(FlowMatrix {
            rows: self.rows.clone(),
            row_totals,
            total,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub name: String,
}

/// A link with endpoints rewritten to node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// A validated node/link graph. Every link endpoint is an index into
/// `nodes`; unresolved references never survive normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
}

impl FlowGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    /// Per-node flow totals: the larger of outgoing and incoming sums, the
    /// quantity the sankey layout sizes node rectangles by.
    pub fn node_totals(&self) -> Vec<f64> {
        let mut outgoing = vec![0.0f64; self.nodes.len()];
        let mut incoming = vec![0.0f64; self.nodes.len()];
        for link in &self.links {
            outgoing[link.source] += link.value;
            incoming[link.target] += link.value;
        }
        outgoing
            .into_iter()
            .zip(incoming)
            .map(|(o, i)| o.max(i))
            .collect()
    }
}

impl GraphDataset {
    /// Builds the name→index lookup and rewrites link endpoints to indices.
    ///
    /// A name that resolves to no node is an error that rejects the whole
    /// dataset; there is no sentinel-index fallback.
    pub fn resolve(&self) -> Result<FlowGraph> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyDataset {
                message: "graph has no nodes".to_string(),
            });
        }

        let mut by_name: IndexMap<&str, usize> = IndexMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if by_name.insert(node.name.as_str(), i).is_some() {
                return Err(Error::DuplicateNode {
                    name: node.name.clone(),
                });
            }
        }

        let mut links = Vec::with_capacity(self.links.len());
        for (li, link) in self.links.iter().enumerate() {
            let source = resolve_endpoint(&by_name, self.nodes.len(), li, &link.source)?;
            let target = resolve_endpoint(&by_name, self.nodes.len(), li, &link.target)?;
            if !link.value.is_finite() || link.value <= 0.0 {
                return Err(Error::InvalidLinkValue {
                    link: li,
                    from_ref: link.source.describe(),
                    to_ref: link.target.describe(),
                    value: link.value,
                });
            }
            links.push(GraphLink {
                source,
                target,
                value: link.value,
            });
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            links = links.len(),
            "resolved graph dataset"
        );

        Ok(FlowGraph {
            nodes: self
                .nodes
                .iter()
                .map(|n| GraphNode {
                    name: n.name.clone(),
                })
                .collect(),
            links,
        })
    }
}

fn resolve_endpoint(
    by_name: &IndexMap<&str, usize>,
    node_count: usize,
    link: usize,
    endpoint: &NodeRef,
) -> Result<usize> {
    match endpoint {
        NodeRef::Name(name) => {
            by_name
                .get(name.as_str())
                .copied()
                .ok_or_else(|| Error::UnknownNode {
                    link,
                    reference: name.clone(),
                })
        }
        NodeRef::Index(i) => {
            if *i < node_count {
                Ok(*i)
            } else {
                Err(Error::NodeIndexOutOfRange {
                    link,
                    index: *i,
                    node_count,
                })
            }
        }
    }
}

/// A validated bar-chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries {
    values: Vec<f64>,
}

impl ValueSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0f64, f64::max)
    }
}

impl SeriesDataset {
    pub fn validate(&self) -> Result<ValueSeries> {
        if self.values.is_empty() {
            return Err(Error::EmptyDataset {
                message: "series has no values".to_string(),
            });
        }
        for (i, &v) in self.values.iter().enumerate() {
            if !v.is_finite() {
                return Err(Error::NonFiniteValue { index: i });
            }
            if v < 0.0 {
                return Err(Error::NegativeValue { index: i, value: v });
            }
        }
        Ok(ValueSeries {
            values: self.values.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{LinkSpec, NodeSpec};

    fn two_node_graph(source: NodeRef, target: NodeRef, value: f64) -> GraphDataset {
        GraphDataset {
            nodes: vec![NodeSpec::new("A"), NodeSpec::new("B")],
            links: vec![LinkSpec {
                source,
                target,
                value,
            }],
        }
    }

    #[test]
    fn matrix_validation_accepts_square_matrix() {
        let matrix = MatrixDataset {
            rows: vec![vec![10.0, 5.0], vec![5.0, 10.0]],
        };
        let flow = matrix.validate().unwrap();
        assert_eq!(flow.size(), 2);
        assert_eq!(flow.row_totals(), &[15.0, 15.0]);
        assert_eq!(flow.total(), 30.0);
    }

    #[test]
    fn matrix_validation_rejects_ragged_rows() {
        let matrix = MatrixDataset {
            rows: vec![vec![1.0, 2.0], vec![3.0]],
        };
        let err = matrix.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn matrix_validation_rejects_negative_cells() {
        let matrix = MatrixDataset {
            rows: vec![vec![1.0, -2.0], vec![3.0, 4.0]],
        };
        let err = matrix.validate().unwrap_err();
        assert!(matches!(err, Error::NegativeCell { row: 0, col: 1, .. }));
    }

    #[test]
    fn matrix_validation_rejects_empty_matrix() {
        let err = MatrixDataset { rows: vec![] }.validate().unwrap_err();
        assert!(matches!(err, Error::EmptyDataset { .. }));
    }

    #[test]
    fn graph_resolution_rewrites_names_to_indices() {
        let graph = two_node_graph("A".into(), "B".into(), 5.0);
        let flow = graph.resolve().unwrap();
        assert_eq!(flow.links().len(), 1);
        assert_eq!(flow.links()[0].source, 0);
        assert_eq!(flow.links()[0].target, 1);
        assert_eq!(flow.node_totals(), vec![5.0, 5.0]);
    }

    #[test]
    fn graph_resolution_rejects_unknown_names() {
        let graph = two_node_graph("Z".into(), "B".into(), 5.0);
        let err = graph.resolve().unwrap_err();
        match err {
            Error::UnknownNode { link, reference } => {
                assert_eq!(link, 0);
                assert_eq!(reference, "Z");
            }
            other => panic!("expected UnknownNode, got {other:?}"),
        }
    }

    #[test]
    fn graph_resolution_bounds_checks_indices() {
        let graph = two_node_graph(0.into(), 7.into(), 5.0);
        let err = graph.resolve().unwrap_err();
        assert!(matches!(
            err,
            Error::NodeIndexOutOfRange {
                index: 7,
                node_count: 2,
                ..
            }
        ));
    }

    #[test]
    fn graph_resolution_rejects_non_positive_weights() {
        for bad in [0.0, -3.0, f64::NAN] {
            let graph = two_node_graph("A".into(), "B".into(), bad);
            let err = graph.resolve().unwrap_err();
            assert!(matches!(err, Error::InvalidLinkValue { link: 0, .. }));
        }
    }

    #[test]
    fn invalid_link_weight_message_names_both_endpoints() {
        let err = two_node_graph("A".into(), 1.into(), -3.0)
            .resolve()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "link 0 (A -> #1) has non-positive weight -3"
        );
        // The endpoint references are plain fields, not an error source.
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn graph_resolution_rejects_duplicate_node_names() {
        let graph = GraphDataset {
            nodes: vec![NodeSpec::new("A"), NodeSpec::new("A")],
            links: vec![],
        };
        let err = graph.resolve().unwrap_err();
        assert!(matches!(err, Error::DuplicateNode { .. }));
    }

    #[test]
    fn series_validation_rejects_negative_values() {
        let err = SeriesDataset {
            values: vec![1.0, -0.5],
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::NegativeValue { index: 1, .. }));
    }

    #[test]
    fn series_max_ignores_nothing_and_defaults_to_zero_floor() {
        let series = SeriesDataset {
            values: vec![3.0, 7.0, 2.0],
        }
        .validate()
        .unwrap();
        assert_eq!(series.max(), 7.0);
        assert_eq!(series.len(), 3);
    }
}
