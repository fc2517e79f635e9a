pub mod loess;
pub mod moving_average;
pub mod running_average;
pub mod std_dev;

pub use loess::LocallyWeightedRegression;
pub use moving_average::MovingAverage;
pub use running_average::RunningAverage;
pub use std_dev::RunningStdDev;

/// Single-pass estimator fed one value per reporting cycle.
///
/// Non-finite input is not filtered: NaN or infinity propagates through the
/// recurrence into every later output.
pub trait OnlineEstimator: std::fmt::Debug {
    /// Fold `value` into the state and return the updated estimate.
    fn update(&mut self, value: f64) -> f64;

    /// Number of values folded in so far.
    fn count(&self) -> u64;
}
