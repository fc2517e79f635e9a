pub mod dataset;
pub mod series_aggregator;
pub mod series_spec;

pub use dataset::{AggregatedDataset, ChartSnapshot};
pub use series_aggregator::SeriesAggregator;
pub use series_spec::SeriesSpec;
