//! Choosing among several candidate surfaces.

use nalgebra::Point3;
use surface_query::ProjectionSurface;
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};

/// Index of the surface nearest to `xyz`.
///
/// A single surface is returned without a distance query. With several,
/// the first surface with the smallest nearest-feature distance wins.
///
/// # Errors
///
/// Returns [`ProjectError::NoSurface`] for an empty slice and propagates
/// nearest-feature query failures.
pub fn select_nearest_surface<S: ProjectionSurface + ?Sized>(
    surfaces: &[&S],
    xyz: &Point3<f64>,
) -> ProjectResult<usize> {
    match surfaces {
        [] => Err(ProjectError::NoSurface),
        [_] => Ok(0),
        _ => {
            let mut best = (0, f64::INFINITY);
            for (index, surface) in surfaces.iter().enumerate() {
                let distance = surface.nearest_feature(xyz)?.distance;
                if distance < best.1 {
                    best = (index, distance);
                }
            }
            debug!(surface = best.0, distance = best.1, "Selected nearest surface");
            Ok(best.0)
        }
    }
}
