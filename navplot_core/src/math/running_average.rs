use super::OnlineEstimator;

/// Cumulative mean of every value seen, without keeping a running sum
#[derive(Debug, Default)]
pub struct RunningAverage {
    avg: f64,
    count: u64,
}

impl RunningAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn average(&mut self, sample: f64) -> f64 {
        self.count += 1;

        if self.count == 1 {
            self.avg = sample;
        } else {
            self.avg += (sample - self.avg) / self.count as f64;
        }

        self.avg
    }

    pub fn value(&self) -> f64 {
        self.avg
    }
}

impl OnlineEstimator for RunningAverage {
    fn update(&mut self, value: f64) -> f64 {
        self.average(value)
    }

    fn count(&self) -> u64 {
        self.count
    }
}
