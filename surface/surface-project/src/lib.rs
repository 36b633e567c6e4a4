//! Point projection onto triangulated surfaces.
//!
//! Projects items with a stereotaxic position onto the nearest of one or
//! more surfaces and records the result in one of two forms:
//!
//! - [`BarycentricProjection`] - a triangle, its three nodes, their raw
//!   signed areas and the signed distance above the surface
//! - [`VanEssenProjection`] - an edge, the two triangles sharing it, the
//!   dihedral and elevation angles and the distance from the edge
//!
//! Projection never modifies the surfaces. Each call owns its scratch
//! state, so one [`SurfaceProjector`] can serve many items.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no rendering dependencies.
//!
//! # Example
//!
//! ```
//! use surface_project::{Landmark, ProjectorParams, SurfaceProjector};
//! use surface_query::IndexedSurface;
//! use surface_types::{unit_square, Point3};
//!
//! let surface = IndexedSurface::new(unit_square()).unwrap();
//! let projector = SurfaceProjector::new(&surface)
//!     .with_params(ProjectorParams::triangle_only());
//!
//! let mut landmarks = vec![
//!     Landmark::new("a", Point3::new(0.25, 0.25, 1.0)),
//!     Landmark::new("b", Point3::new(0.5, 0.5, 0.0)),
//! ];
//! projector.project_landmarks(&mut landmarks).unwrap();
//!
//! for lm in &landmarks {
//!     assert!(lm.primary().unwrap().barycentric.valid);
//! }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod landmark;
mod location;
mod params;
mod projector;
mod record;
mod select;
mod triangle;
mod validate;
mod van_essen;

pub use error::{ProjectError, ProjectResult};
pub use landmark::{Landmark, LandmarkSet};
pub use location::{resolve_location, ProjectionLocation};
pub use params::{
    ProjectorParams, DEFAULT_TRIANGLE_AREA_TOLERANCE, DISTANCE_CONSISTENCY_TOLERANCE,
    VALIDATION_DISTANCE_THRESHOLD,
};
pub use projector::SurfaceProjector;
pub use record::{BarycentricProjection, ProjectedItem, VanEssenProjection};
pub use select::select_nearest_surface;
pub use validate::{ProjectionType, ValidationReport};
