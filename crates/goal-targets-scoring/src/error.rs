use goal_targets_core::MeasureError;

/// Errors returned by the distance estimator.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DistanceError {
    #[error("apparent target height must be positive (got {height} px)")]
    NonPositiveHeight { height: f64 },
    #[error("distance is only defined for a goal")]
    NotAGoal,
    #[error(transparent)]
    Measure(#[from] MeasureError),
}
