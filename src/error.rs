//! Precondition violations rejected before classification.

use thiserror::Error;

use crate::hand::landmark::NUM_LANDMARKS;

/// Reasons a detector output can't be turned into a [`LandmarkSet`].
///
/// These are integration bugs in the detector glue, not transient failures. Classification itself
/// never fails.
///
/// [`LandmarkSet`]: crate::hand::landmark::LandmarkSet
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected {} hand landmarks, got {count}", NUM_LANDMARKS)]
    MalformedLandmarkSet { count: usize },

    #[error("unknown handedness label {0:?} (expected \"Left\" or \"Right\")")]
    UnknownHandedness(String),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}
