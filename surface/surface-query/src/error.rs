//! Error types for surface queries.

use surface_topology::TopologyError;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while building or querying a surface.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Surface has no nodes or no triangles.
    #[error("surface is empty")]
    EmptySurface,

    /// Query coordinate has a NaN or infinite component.
    #[error("query point ({x}, {y}, {z}) is not finite")]
    NonFiniteQuery {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Z coordinate.
        z: f64,
    },

    /// Surface topology could not be built.
    #[error("invalid surface topology: {0}")]
    Topology(#[from] TopologyError),
}
