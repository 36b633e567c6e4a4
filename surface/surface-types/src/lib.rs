//! Core surface types for point-to-surface projection.
//!
//! This crate provides the foundational types shared by the projection crates:
//!
//! - [`Vertex`] - A surface node: position plus optional normal
//! - [`SurfaceMesh`] - A triangulated surface with a [`SurfaceType`] and [`Structure`] tag
//! - [`Triangle`] - Corner positions of one face, with normal and height helpers
//! - [`geometry`] - Plane distances, signed areas, ray-plane intersection
//!
//! # Layer 0 Crate
//!
//! This crate has no rendering or file-format dependencies. Meshes are built
//! in memory by callers (loaders live elsewhere).
//!
//! # Coordinate System
//!
//! Coordinates are stereotaxic millimetres in a **right-handed** system.
//! Face winding is **counter-clockwise (CCW) when viewed from outside**, so
//! triangle normals point outward by the right-hand rule. Flat surfaces lie
//! in the `z = 0` plane and face `+Z`.
//!
//! # Example
//!
//! ```
//! use surface_types::{Point3, Structure, SurfaceMesh, SurfaceType, Vertex};
//!
//! // A flat patch of cortex: one triangle in the z = 0 plane.
//! let mut patch = SurfaceMesh::new(SurfaceType::Flat);
//! patch.structure = Structure::CortexLeft;
//! patch.vertices.extend([
//!     Vertex::from_coords(-2.0, -2.0, 0.0),
//!     Vertex::from_coords(2.0, -2.0, 0.0),
//!     Vertex::from_coords(0.0, 2.0, 0.0),
//! ]);
//! patch.faces.push([0, 1, 2]);
//!
//! let face = patch.triangle(0).unwrap();
//! assert!(face.signed_area_2d() > 0.0);
//! assert_eq!(face.height_of(&Point3::new(0.0, 0.0, 3.0)), 3.0);
//! ```
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod geometry;
mod kind;
mod mesh;
mod triangle;
mod vertex;

pub use kind::{Structure, SurfaceType};
pub use mesh::{unit_octahedron, unit_square, SurfaceMesh};
pub use triangle::Triangle;
pub use vertex::Vertex;

pub use nalgebra::{Point3, Vector3};
