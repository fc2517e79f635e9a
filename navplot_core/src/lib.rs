pub mod aggregator;
pub mod common;
pub mod config;
pub mod math;
pub mod preprocessor;
pub mod report;

pub use aggregator::{ChartSnapshot, SeriesAggregator, SeriesSpec};
pub use common::{
    report_error::{ErrCode, ReportError},
    sample::Sample,
    time::Time,
};
pub use config::ReportConfig;
pub use preprocessor::{Preprocessor, PreprocessorConfig, TradingCalendar};
pub use report::{DataProcessor, DataProvider, ReportingSession};
