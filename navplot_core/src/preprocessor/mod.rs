pub mod calendar;
pub mod preprocessor;
pub mod preprocessor_config;

pub use calendar::{TradingCalendar, WindowCalendar};
pub use preprocessor::{Preprocessor, PreprocessorView};
pub use preprocessor_config::PreprocessorConfig;
