use crate::graph::{EdgeId, NodeId};
use thiserror::Error;

/// Result type alias over the crate [Error].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything the engine reports back to the host.
///
/// An unreachable target or a zero flow is not an error;
/// those are ordinary outcomes.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown node id passed to an algorithm, `source == sink`, `start == target`, etc.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Preconditions of an algorithm or an edit are unmet.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A graph edit referenced a node or an edge that does not exist.
    #[error("{0} not found")]
    NotFound(Missing),

    /// The graph was edited while a run over an older snapshot was still being delivered.
    #[error("graph changed during a run: snapshot at revision {expected}, graph at {found}")]
    ConcurrentModification { expected: u64, found: u64 },

    /// The caller has to supply more input, e.g. a target node, before the run can start.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// A snapshot failed to (de)serialize.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a [Error::NotFound] was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Node(NodeId),
    Edge(EdgeId),
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Node(id) => write!(f, "node {}", id),
            Missing::Edge(id) => write!(f, "edge {}", id),
        }
    }
}

impl Error {
    pub(crate) fn unknown_node(what: &str, id: NodeId) -> Self {
        Error::InvalidArgument(format!("{} {} is not in the graph", what, id))
    }
}
