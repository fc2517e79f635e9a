use serde::Serialize;
use tracing::trace;

use super::calendar::{resolve_periods, WindowCalendar};
use super::preprocessor_config::PreprocessorConfig;
use crate::common::{
    enums::{PreprocessorKind, TimeUnit},
    report_error::ReportError,
    sample::Sample,
};
use crate::math::{
    LocallyWeightedRegression, MovingAverage, OnlineEstimator, RunningAverage, RunningStdDev,
};
use crate::report::{DataProcessor, DataProvider, LatestSamples};

/// Resolved view of a preprocessor's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessorView {
    pub kind: PreprocessorKind,
    pub source: String,
    pub window_size: i64,
    pub window_unit: TimeUnit,
    /// `window_size` scaled by the calendar into reporting cycles
    pub periods: usize,
    pub output: String,
}

/// Derived series: reads `source` each cycle, folds its value into an online
/// estimator and publishes the estimate under `output`.
#[derive(Debug)]
pub struct Preprocessor {
    kind: PreprocessorKind,
    config: PreprocessorConfig,
    periods: usize,
    estimator: Box<dyn OnlineEstimator>,
}

impl Preprocessor {
    pub fn new(
        kind: PreprocessorKind,
        config: PreprocessorConfig,
        calendar: &dyn WindowCalendar,
    ) -> Result<Self, ReportError> {
        config.validate()?;

        // validate() guarantees window_size >= 1
        let window_size = usize::try_from(config.window_size).unwrap_or(usize::MAX);
        let periods = resolve_periods(calendar, window_size, config.window_unit);

        let estimator: Box<dyn OnlineEstimator> = match kind {
            PreprocessorKind::MovingAverage | PreprocessorKind::Regression => {
                Box::new(MovingAverage::new(periods))
            }
            PreprocessorKind::LocallyWeightedRegression => {
                Box::new(LocallyWeightedRegression::new(periods))
            }
            PreprocessorKind::RunningAverage => Box::new(RunningAverage::new()),
            PreprocessorKind::StdDev => Box::new(RunningStdDev::new()),
        };

        Ok(Self {
            kind,
            config,
            periods,
            estimator,
        })
    }

    pub fn moving_average(
        config: PreprocessorConfig,
        calendar: &dyn WindowCalendar,
    ) -> Result<Self, ReportError> {
        Self::new(PreprocessorKind::MovingAverage, config, calendar)
    }

    pub fn regression(
        config: PreprocessorConfig,
        calendar: &dyn WindowCalendar,
    ) -> Result<Self, ReportError> {
        Self::new(PreprocessorKind::Regression, config, calendar)
    }

    pub fn locally_weighted(
        config: PreprocessorConfig,
        calendar: &dyn WindowCalendar,
    ) -> Result<Self, ReportError> {
        Self::new(PreprocessorKind::LocallyWeightedRegression, config, calendar)
    }

    pub fn kind(&self) -> PreprocessorKind {
        self.kind
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Values consumed from upstream so far.
    pub fn consumed(&self) -> u64 {
        self.estimator.count()
    }

    pub fn describe(&self) -> PreprocessorView {
        PreprocessorView {
            kind: self.kind,
            source: self.config.source.clone(),
            window_size: self.config.window_size,
            window_unit: self.config.window_unit,
            periods: self.periods,
            output: self.config.output.clone(),
        }
    }
}

impl DataProvider for Preprocessor {
    fn name(&self) -> &str {
        &self.config.output
    }

    fn report(&mut self, upstream: &LatestSamples, processor: &mut dyn DataProcessor) {
        let Some(input) = upstream.get(&self.config.source) else {
            return;
        };

        let y = self.estimator.update(input.y());
        trace!(
            kind = %self.kind,
            source = %self.config.source,
            input = input.y(),
            output = y,
            "preprocessed sample"
        );
        processor.receive_data(Sample::new(self.config.output.clone(), input.time(), y));
    }
}
