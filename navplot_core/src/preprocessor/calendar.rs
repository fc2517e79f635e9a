use crate::common::enums::TimeUnit;

/// Maps a window unit onto a number of reporting cycles.
///
/// Any `Fn(TimeUnit) -> usize` closure is a calendar.
pub trait WindowCalendar {
    fn samples_per(&self, unit: TimeUnit) -> usize;
}

impl<F> WindowCalendar for F
where
    F: Fn(TimeUnit) -> usize,
{
    fn samples_per(&self, unit: TimeUnit) -> usize {
        self(unit)
    }
}

/// Fixed cycles-per-unit table for a daily reporting cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingCalendar {
    pub per_month: usize,
    pub per_year: usize,
}

impl TradingCalendar {
    /// 21 sessions a month, 252 a year.
    pub const fn trading_days() -> Self {
        Self {
            per_month: 21,
            per_year: 252,
        }
    }

    /// 30 days a month, 365 a year.
    pub const fn calendar_days() -> Self {
        Self {
            per_month: 30,
            per_year: 365,
        }
    }
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self::trading_days()
    }
}

impl WindowCalendar for TradingCalendar {
    fn samples_per(&self, unit: TimeUnit) -> usize {
        match unit {
            TimeUnit::Day => 1,
            TimeUnit::Month => self.per_month,
            TimeUnit::Year => self.per_year,
        }
    }
}

/// Number of cycles covered by `window_size` units, never below 1.
pub fn resolve_periods(calendar: &dyn WindowCalendar, window_size: usize, unit: TimeUnit) -> usize {
    window_size
        .saturating_mul(calendar.samples_per(unit))
        .max(1)
}
