use std::collections::VecDeque;

use super::OnlineEstimator;

/// Online locally-weighted linear regression (LOESS, degree 1).
///
/// Keeps the latest `span` values, indexed by their ordinal in the stream.
/// Each update fits a weighted least-squares line through the retained
/// points with tricube weights `(1 - (d / h)^3)^3`, where `d` is the distance
/// from the newest point and `h` the distance to the farthest retained one,
/// and returns the fitted value at the newest point.
#[derive(Debug)]
pub struct LocallyWeightedRegression {
    span: usize,
    points: VecDeque<(f64, f64)>,
    count: u64,
}

impl LocallyWeightedRegression {
    /// `span` below 1 is treated as 1.
    pub fn new(span: usize) -> Self {
        let span = span.max(1);
        Self {
            span,
            points: VecDeque::with_capacity(span.min(1024)),
            count: 0,
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn smooth(&mut self, value: f64) -> f64 {
        let x = self.count as f64;
        self.count += 1;

        self.points.push_back((x, value));
        if self.points.len() > self.span {
            self.points.pop_front();
        }

        self.fit_at(x)
    }

    fn fit_at(&self, x0: f64) -> f64 {
        let h = self
            .points
            .iter()
            .map(|(x, _)| (x0 - x).abs())
            .fold(0.0, f64::max);
        if h == 0.0 {
            return self.points.back().map_or(0.0, |(_, y)| *y);
        }

        let weights: Vec<f64> = self
            .points
            .iter()
            .map(|(x, _)| tricube((x0 - x).abs() / h))
            .collect();
        let sw: f64 = weights.iter().sum();
        let x_bar = weighted_sum(&weights, self.points.iter().map(|(x, _)| *x)) / sw;
        let y_bar = weighted_sum(&weights, self.points.iter().map(|(_, y)| *y)) / sw;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (w, (x, y)) in weights.iter().zip(self.points.iter()) {
            sxx += w * (x - x_bar).powi(2);
            sxy += w * (x - x_bar) * (y - y_bar);
        }

        // fewer than two weighted abscissae: no slope to fit
        let slope = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };
        y_bar + slope * (x0 - x_bar)
    }
}

fn tricube(u: f64) -> f64 {
    if u >= 1.0 {
        0.0
    } else {
        (1.0 - u.powi(3)).powi(3)
    }
}

fn weighted_sum(weights: &[f64], values: impl Iterator<Item = f64>) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

impl OnlineEstimator for LocallyWeightedRegression {
    fn update(&mut self, value: f64) -> f64 {
        self.smooth(value)
    }

    fn count(&self) -> u64 {
        self.count
    }
}
