//! Projector configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tolerance for the point-in-triangle area test.
///
/// Slightly negative so a point lying on an edge or vertex still counts as
/// contained (as a degenerate projection).
pub const DEFAULT_TRIANGLE_AREA_TOLERANCE: f64 = -0.01;

/// Largest stereotaxic/projected disagreement accepted by validation.
pub const VALIDATION_DISTANCE_THRESHOLD: f64 = 0.01;

/// Largest excess of `|signed distance|` over the search distance.
pub const DISTANCE_CONSISTENCY_TOLERANCE: f64 = 0.01;

/// Parameters for surface projection.
///
/// # Example
///
/// ```
/// use surface_project::ProjectorParams;
///
/// let params = ProjectorParams::default()
///     .surface_offset(2.0)
///     .allow_edge_projection(false)
///     .validate(true);
///
/// assert_eq!(params.surface_offset, Some(2.0));
/// assert!(!params.allow_edge_projection);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectorParams {
    /// Fixed signed distance stored in every projection instead of the
    /// computed one. `None` keeps the geometric distance.
    pub surface_offset: Option<f64>,

    /// Tolerance for the point-in-triangle area test.
    pub area_tolerance: f64,

    /// Produce a validation report for each projected item.
    pub validate: bool,

    /// Allow edge (Van Essen) projections for items resolving to an edge.
    /// When false every item becomes a barycentric projection.
    pub allow_edge_projection: bool,
}

impl Default for ProjectorParams {
    fn default() -> Self {
        Self {
            surface_offset: None,
            area_tolerance: DEFAULT_TRIANGLE_AREA_TOLERANCE,
            validate: false,
            allow_edge_projection: true,
        }
    }
}

impl ProjectorParams {
    /// Create default params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Params that always produce barycentric projections.
    #[must_use]
    pub const fn triangle_only() -> Self {
        Self {
            surface_offset: None,
            area_tolerance: DEFAULT_TRIANGLE_AREA_TOLERANCE,
            validate: false,
            allow_edge_projection: false,
        }
    }

    /// Set a fixed surface offset.
    #[must_use]
    pub const fn surface_offset(mut self, offset: f64) -> Self {
        self.surface_offset = Some(offset);
        self
    }

    /// Clear the surface offset.
    #[must_use]
    pub const fn without_surface_offset(mut self) -> Self {
        self.surface_offset = None;
        self
    }

    /// Set the area tolerance.
    #[must_use]
    pub const fn area_tolerance(mut self, tolerance: f64) -> Self {
        self.area_tolerance = tolerance;
        self
    }

    /// Enable or disable validation reports.
    #[must_use]
    pub const fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Enable or disable edge projections.
    #[must_use]
    pub const fn allow_edge_projection(mut self, allow: bool) -> Self {
        self.allow_edge_projection = allow;
        self
    }
}
