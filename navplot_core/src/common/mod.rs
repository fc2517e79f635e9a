pub mod enums;
pub mod report_error;
pub mod sample;
pub mod time;
