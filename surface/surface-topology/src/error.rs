//! Error types for topology construction.

use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while building surface topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A triangle references a node that does not exist.
    #[error("triangle {triangle} references node {index} (surface has {node_count} nodes)")]
    InvalidIndex {
        /// Triangle holding the bad reference.
        triangle: usize,
        /// The invalid node index.
        index: u32,
        /// Number of nodes in the surface.
        node_count: usize,
    },

    /// A triangle uses the same node more than once.
    #[error("triangle {triangle} repeats a node")]
    RepeatedNode {
        /// Offending triangle.
        triangle: usize,
    },
}

impl TopologyError {
    /// Create an invalid index error.
    #[must_use]
    pub const fn invalid_index(triangle: usize, index: u32, node_count: usize) -> Self {
        Self::InvalidIndex {
            triangle,
            index,
            node_count,
        }
    }
}
