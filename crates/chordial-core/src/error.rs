pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty dataset: {message}")]
    EmptyDataset { message: String },

    #[error("ragged matrix: row {row} has {found} cells, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("negative flow at [{row}][{col}]: {value}")]
    NegativeCell { row: usize, col: usize, value: f64 },

    #[error("non-finite flow at [{row}][{col}]")]
    NonFiniteCell { row: usize, col: usize },

    #[error("duplicate node name: {name}")]
    DuplicateNode { name: String },

    #[error("unknown node {reference:?} in link {link}")]
    UnknownNode { link: usize, reference: String },

    #[error("node index {index} out of range in link {link} ({node_count} nodes)")]
    NodeIndexOutOfRange {
        link: usize,
        index: usize,
        node_count: usize,
    },

    #[error("link {link} ({from_ref} -> {to_ref}) has non-positive weight {value}")]
    InvalidLinkValue {
        link: usize,
        from_ref: String,
        to_ref: String,
        value: f64,
    },

    #[error("negative value at index {index}: {value}")]
    NegativeValue { index: usize, value: f64 },

    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },
}
