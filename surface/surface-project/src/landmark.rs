//! Named landmarks and batch projection.

use surface_query::ProjectionSurface;
use tracing::{info, warn};

use nalgebra::Point3;

use crate::error::{ProjectError, ProjectResult};
use crate::projector::SurfaceProjector;
use crate::record::ProjectedItem;
use crate::validate::ValidationReport;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named point of interest with one or more projections.
///
/// Only the first projection takes part in batch projection; the others
/// are dropped when the batch runs.
///
/// # Example
///
/// ```
/// use surface_project::Landmark;
/// use surface_types::Point3;
///
/// let lm = Landmark::new("central sulcus", Point3::new(1.0, 2.0, 3.0));
/// assert_eq!(lm.name, "central sulcus");
/// assert!(lm.primary().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmark {
    /// Display name, used in batch error messages.
    pub name: String,
    /// Projections of this landmark; the first is primary.
    pub projections: Vec<ProjectedItem>,
}

impl Landmark {
    /// Create a landmark with a single unprojected item at `position`.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Point3<f64>) -> Self {
        Self {
            name: name.into(),
            projections: vec![ProjectedItem::new(position)],
        }
    }

    /// Create a landmark with no projections.
    #[must_use]
    pub fn unplaced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projections: Vec::new(),
        }
    }

    /// Add a projection item.
    #[must_use]
    pub fn with_projection(mut self, item: ProjectedItem) -> Self {
        self.projections.push(item);
        self
    }

    /// The first projection, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&ProjectedItem> {
        self.projections.first()
    }

    /// Keep only the first projection.
    pub fn remove_extra_projections(&mut self) {
        self.projections.truncate(1);
    }
}

/// An ordered collection of landmarks.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarkSet {
    /// Landmarks in insertion order.
    pub landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            landmarks: Vec::new(),
        }
    }

    /// Append a landmark.
    pub fn push(&mut self, landmark: Landmark) {
        self.landmarks.push(landmark);
    }

    /// Number of landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// True when the set holds no landmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// First landmark named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Landmark> {
        self.landmarks.iter().find(|lm| lm.name == name)
    }

    /// Iterate over the landmarks.
    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.landmarks.iter()
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}

impl<S: ProjectionSurface + ?Sized> SurfaceProjector<'_, S> {
    /// Project the primary item of every landmark.
    ///
    /// Extra projections are removed first. Edge projections are used when
    /// the params allow them. A failing landmark does not stop the batch;
    /// every failure is reported in one error once all landmarks have been
    /// attempted. Validation reports of the successful items are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::BatchFailed`] listing each failed landmark as
    /// `"<name>, index=<i>: <error>"`.
    pub fn project_landmarks(
        &self,
        landmarks: &mut [Landmark],
    ) -> ProjectResult<Vec<ValidationReport>> {
        let total = landmarks.len();
        info!(landmarks = total, "Starting landmark projection");

        let mut failures = Vec::new();
        let mut reports = Vec::new();
        for (index, landmark) in landmarks.iter_mut().enumerate() {
            landmark.remove_extra_projections();
            let outcome = match landmark.projections.first_mut() {
                Some(item) => self.project_item(item),
                None => Err(ProjectError::InvalidPosition),
            };
            match outcome {
                Ok(report) => reports.extend(report),
                Err(err) => {
                    warn!(name = %landmark.name, index, error = %err, "Landmark projection failed");
                    failures.push(format!("{}, index={index}: {err}", landmark.name));
                }
            }
        }

        if failures.is_empty() {
            info!(landmarks = total, "Landmark projection complete");
            Ok(reports)
        } else {
            info!(
                landmarks = total,
                failed = failures.len(),
                "Landmark projection finished with failures"
            );
            Err(ProjectError::BatchFailed {
                failed: failures.len(),
                total,
                details: failures.join("\n"),
            })
        }
    }

    /// Project every landmark of `set`; see [`SurfaceProjector::project_landmarks`].
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::BatchFailed`] if any landmark fails.
    pub fn project_landmark_set(
        &self,
        set: &mut LandmarkSet,
    ) -> ProjectResult<Vec<ValidationReport>> {
        self.project_landmarks(&mut set.landmarks)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::params::ProjectorParams;
    use surface_query::IndexedSurface;
    use surface_types::unit_square;

    #[test]
    fn extra_projections_removed() {
        let mut lm = Landmark::new("a", Point3::origin())
            .with_projection(ProjectedItem::new(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(lm.projections.len(), 2);
        lm.remove_extra_projections();
        assert_eq!(lm.projections.len(), 1);
        assert_eq!(lm.primary().unwrap().stereotaxic, Some(Point3::origin()));
    }

    #[test]
    fn set_lookup() {
        let set: LandmarkSet = vec![
            Landmark::new("a", Point3::origin()),
            Landmark::unplaced("b"),
        ]
        .into();
        assert_eq!(set.len(), 2);
        assert!(set.find("b").unwrap().primary().is_none());
        assert!(set.find("c").is_none());
        assert_eq!((&set).into_iter().count(), 2);
    }

    #[test]
    fn batch_reports_every_failure() {
        let surface = IndexedSurface::new(unit_square()).unwrap();
        let projector = SurfaceProjector::new(&surface).with_params(ProjectorParams::triangle_only());

        let mut set: LandmarkSet = [
            Landmark::new("good", Point3::new(0.25, 0.25, 0.0)),
            Landmark::unplaced("empty"),
            Landmark::new("nan", Point3::new(f64::NAN, 0.0, 0.0)),
            Landmark::new("also good", Point3::new(0.75, 0.75, 1.0)),
        ]
        .into_iter()
        .collect();

        let err = projector.project_landmark_set(&mut set).unwrap_err();
        match err {
            ProjectError::BatchFailed {
                failed,
                total,
                details,
            } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 4);
                let lines: Vec<_> = details.lines().collect();
                assert_eq!(lines.len(), 2);
                assert!(lines[0].starts_with("empty, index=1: "));
                assert!(lines[1].starts_with("nan, index=2: "));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(set.landmarks[0].primary().unwrap().is_projected());
        assert!(set.landmarks[3].primary().unwrap().is_projected());
    }

    #[test]
    fn clean_batch_succeeds() {
        let surface = IndexedSurface::new(unit_square()).unwrap();
        let projector = SurfaceProjector::new(&surface);
        let mut landmarks = vec![Landmark::new("a", Point3::new(0.5, 0.25, 0.0))];
        let reports = projector.project_landmarks(&mut landmarks).unwrap();
        assert!(reports.is_empty());
        assert!(landmarks[0].primary().unwrap().barycentric.valid);
    }
}
