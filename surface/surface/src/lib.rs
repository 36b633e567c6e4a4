//! Surface projection toolkit.
//!
//! This umbrella crate re-exports the surface-* crates, providing one API
//! for projecting stereotaxic points onto triangulated surfaces (flat,
//! spherical or general 3D) and recording where they land.
//!
//! # Quick Start
//!
//! ```
//! use surface::prelude::*;
//!
//! let surface = IndexedSurface::new(unit_square()).unwrap();
//! let projector = SurfaceProjector::new(&surface);
//!
//! let mut item = ProjectedItem::new(Point3::new(0.25, 0.25, 1.0));
//! projector.project_item(&mut item).unwrap();
//!
//! let on_surface = item.projected_position(&surface).unwrap();
//! assert!((on_surface.z - 1.0).abs() < 1e-12);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Surface meshes, node and triangle types, plane geometry
//! - [`topology`] - Node tiles, shared edges, mean edge length
//! - [`query`] - Nearest-feature search and the [`ProjectionSurface`](query::ProjectionSurface) trait
//! - [`project`] - Barycentric and edge projection, landmarks, validation
//!
//! # Feature Flags
//!
//! - `serde` - Serialize and deserialize meshes and projection records

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Surface meshes, nodes, triangles and plane geometry.
pub use surface_types as types;

/// Node tiles, shared edges and node neighbourhoods.
pub use surface_topology as topology;

/// Nearest-feature search and queryable surfaces.
pub use surface_query as query;

/// Barycentric and edge projection.
pub use surface_project as project;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for surface projection.
///
/// # Usage
///
/// ```
/// use surface::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use surface_types::{
        unit_octahedron, unit_square, Point3, Structure, SurfaceMesh, SurfaceType, Vector3, Vertex,
    };

    // Queries
    pub use surface_query::{FeatureKind, IndexedSurface, ProjectionSurface};

    // Projection
    pub use surface_project::{
        BarycentricProjection, Landmark, LandmarkSet, ProjectError, ProjectResult, ProjectedItem,
        ProjectorParams, SurfaceProjector, ValidationReport, VanEssenProjection,
    };
}
