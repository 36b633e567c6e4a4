//! Surface topology lookups.
//!
//! Provides the ordered triangle fan around each node, the triangle across
//! an edge, and node neighbourhoods.

use hashbrown::HashMap;
use surface_types::SurfaceMesh;

use crate::error::{TopologyError, TopologyResult};

/// A tile seen from one of its nodes: the node after and before it in winding order.
#[derive(Debug, Clone, Copy)]
struct Corner {
    tile: usize,
    after: u32,
    before: u32,
}

/// Topology information for a triangulated surface.
///
/// Provides lookups for:
/// - Tiles (triangles) around a node, in the order met when walking around it
/// - The triangle on the other side of an edge
/// - Nodes connected to a node by an edge
///
/// Built once per surface; all lookups are read-only afterwards.
#[derive(Debug, Clone)]
pub struct TopologyHelper {
    /// Maps edge (v0, v1) to triangle indices. v0 < v1.
    edge_to_tiles: HashMap<(u32, u32), Vec<usize>>,
    /// Tiles of each node in walk order.
    node_tiles: Vec<Vec<usize>>,
    /// Sorted neighbour nodes of each node.
    node_neighbors: Vec<Vec<usize>>,
}

impl TopologyHelper {
    /// Build topology from a surface mesh.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidIndex`] if a triangle references a
    /// missing node, or [`TopologyError::RepeatedNode`] if a triangle uses a
    /// node twice.
    pub fn new(mesh: &SurfaceMesh) -> TopologyResult<Self> {
        Self::from_faces(&mesh.faces, mesh.node_count())
    }

    /// Build topology from raw triangles over `node_count` nodes.
    ///
    /// # Errors
    ///
    /// Same as [`TopologyHelper::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use surface_topology::TopologyHelper;
    ///
    /// let faces = [[0, 1, 3], [1, 2, 3]];
    /// let topo = TopologyHelper::from_faces(&faces, 4).unwrap();
    ///
    /// assert_eq!(topo.triangle_sharing_edge(1, 3, 0), Some(1));
    /// assert_eq!(topo.triangle_sharing_edge(0, 1, 0), None);
    /// ```
    pub fn from_faces(faces: &[[u32; 3]], node_count: usize) -> TopologyResult<Self> {
        let mut edge_to_tiles: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        let mut corners: Vec<Vec<Corner>> = vec![Vec::new(); node_count];
        let mut node_neighbors: Vec<Vec<usize>> = vec![Vec::new(); node_count];

        for (tile, face) in faces.iter().enumerate() {
            for &v in face {
                if v as usize >= node_count {
                    return Err(TopologyError::invalid_index(tile, v, node_count));
                }
            }
            let [a, b, c] = *face;
            if a == b || b == c || c == a {
                return Err(TopologyError::RepeatedNode { triangle: tile });
            }

            for (n, after, before) in [(a, b, c), (b, c, a), (c, a, b)] {
                corners[n as usize].push(Corner {
                    tile,
                    after,
                    before,
                });
                node_neighbors[n as usize].push(after as usize);
                node_neighbors[n as usize].push(before as usize);
            }

            for edge in [
                normalize_edge(a, b),
                normalize_edge(b, c),
                normalize_edge(c, a),
            ] {
                edge_to_tiles.entry(edge).or_default().push(tile);
            }
        }

        for neighbors in &mut node_neighbors {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let node_tiles = corners.iter().map(|c| order_corners(c)).collect();

        Ok(Self {
            edge_to_tiles,
            node_tiles,
            node_neighbors,
        })
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_tiles.len()
    }

    /// Tiles using `node`, ordered by walking around the node across shared edges.
    ///
    /// For a node on an open boundary the walk starts at the tile with no
    /// predecessor. Tiles the walk cannot reach (non-manifold fans) follow
    /// in index order. Unknown nodes yield an empty slice.
    #[must_use]
    pub fn node_tiles(&self, node: usize) -> &[usize] {
        self.node_tiles.get(node).map_or(&[], Vec::as_slice)
    }

    /// The triangle other than `exclude` that uses the edge `n0`-`n1`.
    ///
    /// Returns `None` when the edge lies on an open boundary or does not exist.
    #[must_use]
    pub fn triangle_sharing_edge(&self, n0: usize, n1: usize, exclude: usize) -> Option<usize> {
        let (Ok(n0), Ok(n1)) = (u32::try_from(n0), u32::try_from(n1)) else {
            return None;
        };
        self.edge_to_tiles
            .get(&normalize_edge(n0, n1))?
            .iter()
            .copied()
            .find(|&t| t != exclude)
    }

    /// Nodes connected to `node` by an edge, sorted ascending.
    #[must_use]
    pub fn node_neighbors(&self, node: usize) -> &[usize] {
        self.node_neighbors.get(node).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_tiles.len()
    }

    /// Iterate over edges used by exactly one triangle.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_tiles
            .iter()
            .filter(|(_, tiles)| tiles.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Mean length of the distinct edges of `mesh`.
    ///
    /// `mesh` must be the surface this helper was built from. Returns 0 for a
    /// surface without edges.
    #[must_use]
    pub fn mean_edge_length(&self, mesh: &SurfaceMesh) -> f64 {
        let (total, count) = self
            .edge_to_tiles
            .keys()
            .filter_map(|&(a, b)| {
                let pa = mesh.coordinate(a as usize)?;
                let pb = mesh.coordinate(b as usize)?;
                Some((pb - pa).norm())
            })
            .fold((0.0, 0_usize), |(sum, n), len| (sum + len, n + 1));

        if count == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = count as f64;
            total / n
        }
    }
}

/// Normalize an edge so the smaller index comes first.
#[inline]
const fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

/// Order a node's corners so consecutive tiles share an edge.
///
/// The tile following `t` is the one whose node after the centre equals
/// `t`'s node before the centre.
fn order_corners(corners: &[Corner]) -> Vec<usize> {
    let mut ordered = Vec::with_capacity(corners.len());
    let mut used = vec![false; corners.len()];

    let has_predecessor =
        |i: usize| corners.iter().any(|c| c.before == corners[i].after && c.tile != corners[i].tile);

    let start = (0..corners.len())
        .find(|&i| !has_predecessor(i))
        .unwrap_or(0);

    let mut current = (!corners.is_empty()).then_some(start);
    while let Some(i) = current {
        used[i] = true;
        ordered.push(corners[i].tile);
        let before = corners[i].before;
        current = (0..corners.len()).find(|&j| !used[j] && corners[j].after == before);
    }

    // Leftovers from non-manifold or inconsistently wound fans
    for (i, corner) in corners.iter().enumerate() {
        if !used[i] {
            ordered.push(corner.tile);
        }
    }

    ordered
}
