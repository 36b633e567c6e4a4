//! Edge (Van Essen) projection.
//!
//! Records a point near a surface edge by the edge foot position, the
//! angles between the two triangles sharing the edge, and the distance
//! from the edge.

use nalgebra::{Point3, Vector3};
use surface_query::ProjectionSurface;
use surface_types::geometry;

use crate::error::{ProjectError, ProjectResult};
use crate::location::ProjectionLocation;
use crate::record::VanEssenProjection;

/// Build an edge projection for an edge `location`.
///
/// With `surface_offset` set, the point is first moved to that signed
/// distance along the nearest triangle's normal. On an open boundary there
/// is no second triangle; the point is then pulled onto the normal line
/// through its edge foot before the angles are measured.
///
/// # Errors
///
/// Returns [`ProjectError::EdgeProjectionFailed`] if the location has no
/// candidate triangle or edge endpoints, and
/// [`ProjectError::TopologyInconsistency`] if surface data for a candidate
/// triangle is missing.
pub(crate) fn project_van_essen<S: ProjectionSurface + ?Sized>(
    surface: &S,
    location: &ProjectionLocation,
    surface_offset: Option<f64>,
) -> ProjectResult<VanEssenProjection> {
    let tri_a = location
        .nearest_triangle()
        .ok_or_else(|| ProjectError::edge_failed("unable to find nearest triangle"))?;
    let (Some(i_r), Some(j_r)) = (location.nodes[0], location.nodes[1]) else {
        return Err(ProjectError::edge_failed("location has no edge endpoints"));
    };
    let tri_b = location.opposite_triangle();

    let (nodes_a, coords_a) = triangle_data(surface, tri_a)?;
    let plane_normal = geometry::normal_vector(&coords_a[0], &coords_a[1], &coords_a[2]);
    let on_plane = geometry::project_point_to_plane(&location.point, &coords_a[0], &plane_normal);

    let mut xyz = location.point;
    if let Some(offset) = surface_offset {
        xyz = on_plane + plane_normal * offset;
    }

    let coord_i = node_coordinate(surface, i_r)?;
    let coord_j = node_coordinate(surface, j_r)?;

    let normal_a = triangle_normal(surface, tri_a)?;
    let side_b = match tri_b {
        Some(t) => Some((triangle_data(surface, t)?, triangle_normal(surface, t)?)),
        None => None,
    };

    if side_b.is_none() {
        xyz = pull_onto_edge_normal(&xyz, &on_plane, &coord_i, &coord_j, &normal_a);
    }

    let q_r = geometry::line_foot(&coord_i, &coord_j, &xyz);

    let phi_r = side_b
        .as_ref()
        .map_or(0.0, |(_, normal_b)| normal_a.dot(normal_b).min(1.0).acos());

    let t1 = (xyz - q_r).try_normalize(0.0).unwrap_or_else(Vector3::zeros);
    let t3 = normal_a.dot(&t1);
    let theta_r = if t3 > 0.0 { t3.min(1.0).acos() } else { 0.0 };

    let edge_length = (coord_j - coord_i).norm();
    let (frac_ri, frac_rj) = if edge_length > 0.0 {
        (
            (q_r - coord_i).norm() / edge_length,
            (q_r - coord_j).norm() / edge_length,
        )
    } else {
        (0.0, 0.0)
    };

    let origin = Point3::origin();
    let (nodes_b, coords_b) = side_b
        .map_or(([0; 3], [origin; 3]), |(data, _)| data);

    Ok(VanEssenProjection {
        valid: true,
        vertex: [i_r, j_r],
        vertex_anatomical: [coord_i, coord_j],
        tri_vertices: [swap_ends(nodes_a), swap_ends(nodes_b)],
        tri_anatomical: [swap_ends(coords_a), swap_ends(coords_b)],
        phi_r,
        theta_r,
        frac_ri,
        frac_rj,
        d_r: (q_r - xyz).norm(),
        surface_node_count: surface.node_count(),
    })
}

/// Move `xyz` onto the line through its edge foot along `normal_a`.
///
/// The height above the foot is the square root of the point's distance
/// from the triangle plane, scaled by how well the offset direction lines
/// up with `normal_a`. A foot past either endpoint snaps to the opposite
/// endpoint, and the `I` side check is skipped whenever the `J` side
/// length is zero.
fn pull_onto_edge_normal(
    xyz: &Point3<f64>,
    on_plane: &Point3<f64>,
    coord_i: &Point3<f64>,
    coord_j: &Point3<f64>,
    normal_a: &Vector3<f64>,
) -> Point3<f64> {
    let offset = xyz - on_plane;
    let d_r = offset.norm().sqrt();

    let mut q_r = geometry::line_foot(coord_i, coord_j, xyz);

    let len_ij = (coord_j - coord_i).norm();
    let len_ji = (coord_i - coord_j).norm();
    let mut frac_ri = if len_ij > 0.0 {
        (q_r - coord_i).norm() / len_ij
    } else {
        0.0
    };
    let frac_rj = if len_ji > 0.0 {
        (q_r - coord_j).norm() / len_ji
    } else {
        frac_ri = 0.0;
        0.0
    };
    if frac_ri > 1.0 {
        q_r = *coord_j;
    }
    if frac_rj > 1.0 {
        q_r = *coord_i;
    }

    let direction = offset.try_normalize(0.0).unwrap_or(offset);
    let t3 = direction.dot(normal_a);
    q_r + normal_a * (d_r * t3)
}

fn node_coordinate<S: ProjectionSurface + ?Sized>(
    surface: &S,
    node: usize,
) -> ProjectResult<Point3<f64>> {
    surface
        .coordinate(node)
        .ok_or_else(|| ProjectError::topology(format!("node {node} has no coordinate")))
}

fn triangle_normal<S: ProjectionSurface + ?Sized>(
    surface: &S,
    triangle: usize,
) -> ProjectResult<Vector3<f64>> {
    surface
        .triangle_normal(triangle)
        .ok_or_else(|| ProjectError::topology(format!("triangle {triangle} has no normal")))
}

fn triangle_data<S: ProjectionSurface + ?Sized>(
    surface: &S,
    triangle: usize,
) -> ProjectResult<([usize; 3], [Point3<f64>; 3])> {
    let nodes = surface
        .triangle(triangle)
        .ok_or_else(|| ProjectError::topology(format!("triangle {triangle} does not exist")))?;
    let coords = [
        node_coordinate(surface, nodes[0])?,
        node_coordinate(surface, nodes[1])?,
        node_coordinate(surface, nodes[2])?,
    ];
    Ok((nodes, coords))
}

const fn swap_ends<T: Copy>(mut v: [T; 3]) -> [T; 3] {
    let first = v[0];
    v[0] = v[2];
    v[2] = first;
    v
}
