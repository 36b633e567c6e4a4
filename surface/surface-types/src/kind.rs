//! Surface classification tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometric kind of a surface.
///
/// The kind selects how a query point is brought onto a triangle's plane
/// before the containment test:
///
/// - `Flat`: the query is dropped onto `z = 0` and the normal forced to `+Z`
/// - `Spherical`: the query is moved along the ray from the origin
/// - `Generic3D`: the query is projected orthogonally onto the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceType {
    /// Flattened surface lying in the `z = 0` plane.
    Flat,
    /// Spherical surface centred on the origin.
    Spherical,
    /// Any other folded 3D surface (anatomical, inflated, ...).
    #[default]
    Generic3D,
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "FLAT",
            Self::Spherical => "SPHERICAL",
            Self::Generic3D => "GENERIC_3D",
        };
        f.write_str(name)
    }
}

/// Anatomical structure a surface represents.
///
/// Projections record the structure of the surface they were made on so a
/// later consumer can pick a matching surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Structure {
    /// Unknown or unset structure.
    #[default]
    Invalid,
    /// Left cerebral cortex.
    CortexLeft,
    /// Right cerebral cortex.
    CortexRight,
    /// Cerebellum.
    Cerebellum,
    /// Any other structure.
    Other,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "INVALID",
            Self::CortexLeft => "CORTEX_LEFT",
            Self::CortexRight => "CORTEX_RIGHT",
            Self::Cerebellum => "CEREBELLUM",
            Self::Other => "OTHER",
        };
        f.write_str(name)
    }
}
