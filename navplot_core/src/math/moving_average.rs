use super::OnlineEstimator;

/// Smoothed average over `number_of_periods` values.
///
/// Up to and including the `number_of_periods`-th call the output is the plain
/// cumulative mean. After that each value is blended into the previous output:
///
/// ```text
/// sma = (previous * (n - 1) + value) / n
/// ```
///
/// The oldest value is never subtracted, so once warmed up this behaves like an
/// exponential smoother with weight `1 / n` rather than a box-car window.
#[derive(Debug)]
pub struct MovingAverage {
    number_of_periods: usize,
    last_value: f64,
    count: u64,
}

impl MovingAverage {
    /// `number_of_periods` below 1 is treated as 1.
    pub fn new(number_of_periods: usize) -> Self {
        Self {
            number_of_periods: number_of_periods.max(1),
            last_value: 0.0,
            count: 0,
        }
    }

    pub fn number_of_periods(&self) -> usize {
        self.number_of_periods
    }

    pub fn sma_of(&mut self, value: f64) -> f64 {
        self.count += 1;
        let periods = self.number_of_periods as f64;

        self.last_value = if self.count == 1 {
            value
        } else if self.count <= self.number_of_periods as u64 {
            self.last_value + (value - self.last_value) / self.count as f64
        } else {
            (self.last_value * (periods - 1.0) + value) / periods
        };

        self.last_value
    }

    /// Overrides the previous output and skips the warm-up phase, so the next
    /// `sma_of` call blends into `value`. The call counter only moves forward.
    pub fn set_last_value(&mut self, value: f64) {
        self.last_value = value;
        self.count = self.count.max(self.number_of_periods as u64);
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }
}

impl OnlineEstimator for MovingAverage {
    fn update(&mut self, value: f64) -> f64 {
        self.sma_of(value)
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAINS: [f64; 26] = [
        1.00, 0.59, 0.72, 0.50, 0.00, 0.44, 0.00, 0.88, 0.78, 0.00, 1.34, 0.45, 0.68, 0.46,
        1.10, 0.80, 0.00, 1.15, 0.92, 0.00, 1.42, 2.06, 1.00, 1.20, 0.62, 6.77,
    ];

    #[test]
    fn test_reference_checkpoints() {
        let mut sma = MovingAverage::new(14);
        let outputs: Vec<f64> = GAINS.iter().map(|g| sma.sma_of(*g)).collect();

        // 14th input 0.46 closes the warm-up
        assert!((outputs[13] - 0.56).abs() < 0.01);
        // first steady-state step, input 1.10
        assert!((outputs[14] - 0.59).abs() < 0.01);
        // final input 6.77
        assert!((outputs[25] - 1.21).abs() < 0.01);
    }

    #[test]
    fn test_warm_up_is_cumulative_mean() {
        let mut sma = MovingAverage::new(14);
        let mut sum = 0.0;
        for (k, g) in GAINS.iter().take(14).enumerate() {
            sum += g;
            let out = sma.sma_of(*g);
            assert!((out - sum / (k + 1) as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_steady_state_is_not_box_car() {
        let mut sma = MovingAverage::new(14);
        let outputs: Vec<f64> = GAINS.iter().map(|g| sma.sma_of(*g)).collect();
        let box_car = GAINS[1..15].iter().sum::<f64>() / 14.0;
        let expected = (outputs[13] * 13.0 + GAINS[14]) / 14.0;
        assert!((outputs[14] - expected).abs() < 1e-12);
        assert!((outputs[14] - box_car).abs() > 0.02);
    }

    #[test]
    fn test_set_last_value_warm_start() {
        let mut sma = MovingAverage::new(4);
        sma.set_last_value(2.0);
        assert_eq!(sma.count(), 4);
        // blends straight away: (2 * 3 + 6) / 4
        assert!((sma.sma_of(6.0) - 3.0).abs() < 1e-12);
        assert_eq!(sma.count(), 5);

        sma.set_last_value(1.0);
        assert_eq!(sma.count(), 5);
        assert!((sma.sma_of(5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_period_tracks_input() {
        let mut sma = MovingAverage::new(0);
        assert_eq!(sma.number_of_periods(), 1);
        assert_eq!(sma.sma_of(3.0), 3.0);
        assert_eq!(sma.sma_of(-1.5), -1.5);
    }
}
