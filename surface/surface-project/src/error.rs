//! Error types for surface projection.

use surface_query::QueryError;
use thiserror::Error;

/// Result type for projection operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors that can occur while projecting an item.
///
/// Every variant except [`ProjectError::BatchFailed`] is fatal to a single
/// item only; batch projection collects them and keeps going.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The projector was given no surfaces.
    #[error("no surface for projection")]
    NoSurface,

    /// The item has no usable stereotaxic position.
    #[error("stereotaxic position is invalid, cannot project")]
    InvalidPosition,

    /// The target surface has no nodes or no triangles.
    #[error("surface has {nodes} nodes and {triangles} triangles")]
    EmptyMesh {
        /// Node count of the surface.
        nodes: usize,
        /// Triangle count of the surface.
        triangles: usize,
    },

    /// Signed and absolute distances from the nearest-feature search disagree.
    #[error("signed/absolute distance mismatch of {difference}: {location}")]
    GeometryInconsistency {
        /// `|signed| - absolute`.
        difference: f64,
        /// Description of the resolved location.
        location: String,
    },

    /// Surface topology contradicts the nearest-feature search.
    #[error("topology inconsistency: {details}")]
    TopologyInconsistency {
        /// What was inconsistent.
        details: String,
    },

    /// No valid edge projection could be built.
    #[error("edge projection failed: {reason}")]
    EdgeProjectionFailed {
        /// Reason for failure.
        reason: String,
    },

    /// No triangle contains the point, even with degenerate tolerance.
    #[error("triangle projection failed: {reason}")]
    TriangleProjectionFailed {
        /// Reason for failure.
        reason: String,
    },

    /// Nearest-feature query failed.
    #[error("surface query failed: {0}")]
    Query(#[from] QueryError),

    /// One or more items of a batch failed.
    ///
    /// `details` holds one line per failed item.
    #[error("{failed} of {total} items failed to project:\n{details}")]
    BatchFailed {
        /// Number of failed items.
        failed: usize,
        /// Number of items in the batch.
        total: usize,
        /// Per-item messages, newline separated.
        details: String,
    },
}

impl ProjectError {
    /// Create a topology inconsistency error.
    pub fn topology(details: impl Into<String>) -> Self {
        Self::TopologyInconsistency {
            details: details.into(),
        }
    }

    /// Create an edge projection failure.
    pub fn edge_failed(reason: impl Into<String>) -> Self {
        Self::EdgeProjectionFailed {
            reason: reason.into(),
        }
    }

    /// Create a triangle projection failure.
    pub fn triangle_failed(reason: impl Into<String>) -> Self {
        Self::TriangleProjectionFailed {
            reason: reason.into(),
        }
    }

    /// Create an empty mesh error.
    #[must_use]
    pub const fn empty_mesh(nodes: usize, triangles: usize) -> Self {
        Self::EmptyMesh { nodes, triangles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ProjectError::NoSurface.to_string(), "no surface for projection");
        assert_eq!(
            ProjectError::empty_mesh(0, 4).to_string(),
            "surface has 0 nodes and 4 triangles"
        );
        assert_eq!(
            ProjectError::triangle_failed("no containing triangle").to_string(),
            "triangle projection failed: no containing triangle"
        );

        let err = ProjectError::BatchFailed {
            failed: 1,
            total: 3,
            details: "LM2, index=1: stereotaxic position is invalid, cannot project".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("1 of 3 items failed to project:\n"));
        assert!(msg.contains("index=1"));
    }

    #[test]
    fn query_error_converts() {
        let err: ProjectError = QueryError::EmptySurface.into();
        assert!(matches!(err, ProjectError::Query(_)));
    }
}
