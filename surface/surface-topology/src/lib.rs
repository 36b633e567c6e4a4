//! Topology lookups for triangulated surfaces.
//!
//! This crate provides:
//! - Tiles around a node in walk order (fans), with open-boundary handling
//! - The triangle sharing an edge with a given triangle
//! - Node neighbourhoods and mean edge length
//!
//! # Layer 0
//!
//! This is a Layer 0 crate. It depends only on `surface-types`.
//!
//! # Example
//!
//! ```
//! use surface_types::unit_square;
//! use surface_topology::TopologyHelper;
//!
//! let square = unit_square();
//! let topo = TopologyHelper::new(&square).unwrap();
//!
//! // Node 1 touches both triangles of the square
//! assert_eq!(topo.node_tiles(1).len(), 2);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod adjacency;
mod error;

pub use adjacency::TopologyHelper;
pub use error::{TopologyError, TopologyResult};
