pub mod processor;
pub mod provider;
pub mod session;

pub use processor::{DataProcessor, NullProcessor, SampleBuffer};
pub use provider::{DataProvider, FeedSeries, LatestSamples};
pub use session::{CycleState, ReportingSession};
