//! Surface queries for point projection.
//!
//! This crate provides:
//! - [`ProjectionSurface`] - the read-only surface view projection works against
//! - [`IndexedSurface`] - a [`SurfaceMesh`](surface_types::SurfaceMesh) with
//!   topology and normals precomputed
//! - [`find_nearest_feature`] - closest node, edge or triangle to a point
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no rendering dependencies.
//!
//! # Example
//!
//! ```
//! use surface_query::{IndexedSurface, ProjectionSurface, FeatureKind};
//! use surface_types::{unit_square, Point3};
//!
//! let surface = IndexedSurface::new(unit_square()).unwrap();
//!
//! // A point on the shared diagonal is nearest to an edge
//! let f = surface.nearest_feature(&Point3::new(0.5, 0.5, 0.0)).unwrap();
//! assert_eq!(f.kind, FeatureKind::Edge);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod feature;
mod surface;

pub use error::{QueryError, QueryResult};
pub use feature::{closest_point_barycentric, find_nearest_feature, FeatureKind, NearestFeature};
pub use surface::{IndexedSurface, ProjectionSurface};
