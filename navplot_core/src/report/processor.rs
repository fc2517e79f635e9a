use crate::common::{sample::Sample, time::Time};

/// Consumer side of a reporting cycle.
///
/// A driver calls `start_reporting_cycle`, routes every sample the providers
/// emit through `receive_data` in emission order, then closes the cycle with
/// `collect_reports`.
pub trait DataProcessor {
    fn start_reporting_cycle(&mut self, _time: Time) {}

    fn receive_data(&mut self, sample: Sample);

    fn collect_reports(&mut self) {}
}

/// Accepts every protocol call and does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProcessor;

impl DataProcessor for NullProcessor {
    fn receive_data(&mut self, _sample: Sample) {}
}

/// Collects samples in arrival order
#[derive(Debug, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Sample> {
        self.samples.drain(..)
    }
}

impl DataProcessor for SampleBuffer {
    fn receive_data(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}
