//! Indexed triangulated surface.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Structure, SurfaceType, Triangle, Vertex};

/// A triangulated surface with projection metadata.
///
/// Nodes and triangles are stored the way an indexed mesh stores them:
/// triangles reference nodes by index, with **counter-clockwise (CCW)
/// winding** viewed from outside.
///
/// Besides geometry the surface carries its [`SurfaceType`], which decides
/// how query points are brought onto triangle planes, and the anatomical
/// [`Structure`] it represents.
///
/// # Example
///
/// ```
/// use surface_types::{SurfaceMesh, SurfaceType, Structure, Vertex};
///
/// let mesh = SurfaceMesh::from_parts(
///     SurfaceType::Generic3D,
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// )
/// .with_structure(Structure::CortexLeft);
///
/// assert_eq!(mesh.node_count(), 3);
/// assert_eq!(mesh.structure, Structure::CortexLeft);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceMesh {
    /// Node data.
    pub vertices: Vec<Vertex>,

    /// Triangles as indices into the node array.
    pub faces: Vec<[u32; 3]>,

    /// Geometric kind of the surface.
    pub surface_type: SurfaceType,

    /// Anatomical structure the surface represents.
    pub structure: Structure,
}

impl SurfaceMesh {
    /// Create a new empty surface of the given kind.
    #[inline]
    #[must_use]
    pub const fn new(surface_type: SurfaceType) -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            surface_type,
            structure: Structure::Invalid,
        }
    }

    /// Create a surface from nodes and triangles.
    #[inline]
    #[must_use]
    pub const fn from_parts(
        surface_type: SurfaceType,
        vertices: Vec<Vertex>,
        faces: Vec<[u32; 3]>,
    ) -> Self {
        Self {
            vertices,
            faces,
            surface_type,
            structure: Structure::Invalid,
        }
    }

    /// Create a surface from flat coordinate and index arrays.
    ///
    /// Returns an empty surface if either array length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use surface_types::{SurfaceMesh, SurfaceType};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = SurfaceMesh::from_raw(SurfaceType::Flat, &positions, &[0, 1, 2]);
    /// assert_eq!(mesh.triangle_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(surface_type: SurfaceType, positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new(surface_type);
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self::from_parts(surface_type, vertices, faces)
    }

    /// Set the anatomical structure.
    #[inline]
    #[must_use]
    pub const fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the surface has no nodes or no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Position of node `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn coordinate(&self, index: usize) -> Option<Point3<f64>> {
        self.vertices.get(index).map(|v| v.position)
    }

    /// Node indices of triangle `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn face_nodes(&self, index: usize) -> Option<[usize; 3]> {
        self.faces
            .get(index)
            .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
    }

    /// Concrete triangle `index`.
    ///
    /// Returns `None` when the triangle or any of its nodes is out of range.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let [a, b, c] = self.face_nodes(index)?;
        Some(Triangle::new(
            self.coordinate(a)?,
            self.coordinate(b)?,
            self.coordinate(c)?,
        ))
    }

    /// Iterate over all valid triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(move |i| self.triangle(i))
    }

    /// Mean distance of the nodes from the origin.
    ///
    /// For a spherical surface this is its radius. Returns 0 for an empty surface.
    #[must_use]
    pub fn spherical_radius(&self) -> f64 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        let total: f64 = self.vertices.iter().map(|v| v.position.coords.norm()).sum();
        #[allow(clippy::cast_precision_loss)]
        let n = self.vertices.len() as f64;
        total / n
    }

    /// Fill every node normal with the area-weighted mean of its face normals.
    ///
    /// Nodes with no incident faces get `None`.
    pub fn compute_vertex_normals(&mut self) {
        let mut sums = vec![Vector3::<f64>::zeros(); self.vertices.len()];

        for face_idx in 0..self.faces.len() {
            let (Some(nodes), Some(tri)) = (self.face_nodes(face_idx), self.triangle(face_idx))
            else {
                continue;
            };
            // Unnormalized normal is already weighted by twice the area
            let n = tri.normal_unnormalized();
            for node in nodes {
                sums[node] += n;
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            let len = sum.norm();
            vertex.normal = (len > 0.0).then(|| sum / len);
        }
    }

    /// Fill only missing node normals, keeping the ones supplied.
    pub fn fill_missing_normals(&mut self) {
        if self.vertices.iter().all(|v| v.normal.is_some()) {
            return;
        }
        let supplied: Vec<_> = self.vertices.iter().map(|v| v.normal).collect();
        self.compute_vertex_normals();
        for (vertex, normal) in self.vertices.iter_mut().zip(supplied) {
            if normal.is_some() {
                vertex.normal = normal;
            }
        }
    }
}

/// Create a flat unit square made of two triangles.
///
/// Nodes `0..4` are `(0,0)`, `(1,0)`, `(1,1)`, `(0,1)` at `z = 0`. Triangle 0
/// is `[0, 1, 3]` (lower-left half), triangle 1 is `[1, 2, 3]`. The diagonal
/// edge `1-3` is shared.
///
/// # Example
///
/// ```
/// use surface_types::{unit_square, SurfaceType};
///
/// let square = unit_square();
/// assert_eq!(square.surface_type, SurfaceType::Flat);
/// assert_eq!(square.triangle_count(), 2);
/// ```
#[must_use]
pub fn unit_square() -> SurfaceMesh {
    let up = Vector3::z();
    SurfaceMesh::from_parts(
        SurfaceType::Flat,
        vec![
            Vertex::with_normal(Point3::new(0.0, 0.0, 0.0), up), // 0
            Vertex::with_normal(Point3::new(1.0, 0.0, 0.0), up), // 1
            Vertex::with_normal(Point3::new(1.0, 1.0, 0.0), up), // 2
            Vertex::with_normal(Point3::new(0.0, 1.0, 0.0), up), // 3
        ],
        vec![[0, 1, 3], [1, 2, 3]],
    )
}

/// Create a closed octahedron with nodes on the unit axes.
///
/// The surface is tagged [`SurfaceType::Spherical`]; all six nodes lie at
/// distance 1 from the origin and carry radial normals.
///
/// # Example
///
/// ```
/// use surface_types::unit_octahedron;
///
/// let oct = unit_octahedron();
/// assert_eq!(oct.node_count(), 6);
/// assert_eq!(oct.triangle_count(), 8);
/// assert!((oct.spherical_radius() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn unit_octahedron() -> SurfaceMesh {
    let axes = [
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ];
    let vertices = axes
        .iter()
        .map(|a| Vertex::with_normal(Point3::from(*a), *a))
        .collect();

    // Upper four faces around +Z, lower four around -Z, CCW from outside
    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];

    SurfaceMesh::from_parts(SurfaceType::Spherical, vertices, faces)
}
