use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::processor::DataProcessor;
use crate::common::{sample::Sample, time::Time};

/// Originates or derives one named series.
///
/// Providers are driven uniformly through this trait: the session hands each
/// one the samples already published this cycle and the processor to emit into.
pub trait DataProvider: fmt::Debug {
    /// Series name this provider publishes under.
    fn name(&self) -> &str;

    /// Emit zero or more samples for the open cycle.
    fn report(&mut self, upstream: &LatestSamples, processor: &mut dyn DataProcessor);
}

/// Most recent sample per series published during the open cycle
#[derive(Debug, Default)]
pub struct LatestSamples {
    cycle_time: Option<Time>,
    samples: HashMap<String, Sample>,
}

impl LatestSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything published in the previous cycle.
    pub fn reset(&mut self, cycle_time: Time) {
        self.cycle_time = Some(cycle_time);
        self.samples.clear();
    }

    pub fn record(&mut self, sample: &Sample) {
        self.samples
            .insert(sample.source_name().to_string(), sample.clone());
    }

    pub fn get(&self, name: &str) -> Option<&Sample> {
        self.samples.get(name)
    }

    pub fn cycle_time(&self) -> Option<Time> {
        self.cycle_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Raw series fed by the external driver.
///
/// Queued samples are emitted, in queue order, on the next `report`.
#[derive(Debug)]
pub struct FeedSeries {
    name: String,
    pending: VecDeque<Sample>,
}

impl FeedSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: VecDeque::new(),
        }
    }

    /// Queue a value under this series' name.
    pub fn push(&mut self, time: Time, y: f64) {
        self.pending.push_back(Sample::new(self.name.clone(), time, y));
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl DataProvider for FeedSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&mut self, _upstream: &LatestSamples, processor: &mut dyn DataProcessor) {
        for sample in self.pending.drain(..) {
            processor.receive_data(sample);
        }
    }
}
