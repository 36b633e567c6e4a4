//! Surface nodes.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One node of a surface: where it sits and, once known, which way the
/// surface faces there.
///
/// Loaders may leave `normal` empty. [`SurfaceMesh::compute_vertex_normals`]
/// derives it from the faces around the node.
///
/// [`SurfaceMesh::compute_vertex_normals`]: crate::SurfaceMesh::compute_vertex_normals
///
/// ```
/// use surface_types::{Point3, Vector3, Vertex};
///
/// let bare: Vertex = [10.0, -4.5, 22.0].into();
/// assert_eq!(bare.position, Point3::new(10.0, -4.5, 22.0));
/// assert!(bare.normal.is_none());
///
/// let oriented = Vertex::with_normal(bare.position, Vector3::x());
/// assert_eq!(oriented.normal, Some(Vector3::x()));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Stereotaxic position.
    pub position: Point3<f64>,

    /// Outward unit normal, `None` until computed.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Node at `position` with no normal yet.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Node at `(x, y, z)` with no normal yet.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Node with a known normal. `normal` is expected to have unit length.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}
