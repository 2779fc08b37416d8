use serde::{Deserialize, Serialize};

/// A dataset supplied by the host page or the CLI.
///
/// The JSON form is externally tagged on `type`:
///
/// ```json
/// {"type": "graph", "nodes": [{"name": "A"}], "links": []}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Dataset {
    /// Square matrix of pairwise flow magnitudes; drives a chord diagram.
    Matrix(MatrixDataset),
    /// Named nodes plus weighted links; drives a sankey diagram.
    Graph(GraphDataset),
    /// Plain value series; drives a bar chart.
    Series(SeriesDataset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Chord,
    Sankey,
    Bars,
}

impl Dataset {
    pub fn matrix(rows: Vec<Vec<f64>>) -> Self {
        Self::Matrix(MatrixDataset { rows })
    }

    pub fn graph(nodes: Vec<NodeSpec>, links: Vec<LinkSpec>) -> Self {
        Self::Graph(GraphDataset { nodes, links })
    }

    pub fn series(values: Vec<f64>) -> Self {
        Self::Series(SeriesDataset { values })
    }

    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Matrix(_) => DiagramKind::Chord,
            Self::Graph(_) => DiagramKind::Sankey,
            Self::Series(_) => DiagramKind::Bars,
        }
    }
}

/// Cell `[i][j]` is the flow magnitude from category `i` to category `j`.
/// Row count defines the group count; validation requires the matrix to be
/// square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDataset {
    pub rows: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDataset {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: NodeRef,
    pub target: NodeRef,
    pub value: f64,
}

/// A link endpoint: a node name or a positional index into `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Index(usize),
    Name(String),
}

impl NodeRef {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Index(i) => format!("#{i}"),
            Self::Name(name) => name.clone(),
        }
    }
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDataset {
    pub values: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn graph_dataset_deserializes_named_and_indexed_endpoints() {
        let value = json!({
            "type": "graph",
            "nodes": [{"name": "A"}, {"name": "B"}],
            "links": [
                {"source": "A", "target": "B", "value": 5.0},
                {"source": 0, "target": 1, "value": 2.5},
            ],
        });

        let dataset: Dataset = serde_json::from_value(value).unwrap();
        let Dataset::Graph(graph) = dataset else {
            panic!("expected graph dataset");
        };
        assert_eq!(graph.links[0].source, NodeRef::Name("A".to_string()));
        assert_eq!(graph.links[1].source, NodeRef::Index(0));
        assert_eq!(graph.links[1].target, NodeRef::Index(1));
    }

    #[test]
    fn matrix_dataset_round_trips() {
        let dataset = Dataset::matrix(vec![vec![10.0, 5.0], vec![5.0, 10.0]]);
        let text = serde_json::to_string(&dataset).unwrap();
        let back: Dataset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dataset);
        assert_eq!(back.kind(), DiagramKind::Chord);
    }

    #[test]
    fn graph_links_default_to_empty() {
        let value = json!({"type": "graph", "nodes": [{"name": "A"}]});
        let dataset: Dataset = serde_json::from_value(value).unwrap();
        let Dataset::Graph(graph) = dataset else {
            panic!("expected graph dataset");
        };
        assert!(graph.links.is_empty());
    }
}
