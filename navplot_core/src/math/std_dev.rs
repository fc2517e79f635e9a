use super::OnlineEstimator;

/// Standard deviation of the whole stream, Welford's algorithm.
///
/// Population deviation by default; `sample()` applies Bessel's correction.
#[derive(Debug, Default)]
pub struct RunningStdDev {
    count: u64,
    mean: f64,
    m2: f64,
    bessel: bool,
}

impl RunningStdDev {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample() -> Self {
        Self {
            bessel: true,
            ..Self::default()
        }
    }

    pub fn std(&mut self, sample: f64) -> f64 {
        self.count += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample - self.mean);

        self.std_dev()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 0 until there are enough samples for the chosen divisor.
    pub fn variance(&self) -> f64 {
        let divisor = if self.bessel {
            self.count.saturating_sub(1)
        } else {
            self.count
        };
        if divisor == 0 {
            0.0
        } else {
            self.m2 / divisor as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl OnlineEstimator for RunningStdDev {
    fn update(&mut self, value: f64) -> f64 {
        self.std(value)
    }

    fn count(&self) -> u64 {
        self.count
    }
}
