use serde::Serialize;

use super::time::Time;

/// One timestamped value published under a source name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    source_name: String,
    time: Time,
    y: f64,
}

impl Sample {
    pub fn new(source_name: impl Into<String>, time: Time, y: f64) -> Self {
        Self {
            source_name: source_name.into(),
            time,
            y,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Zero value: empty name, stamped now, y = 0.
impl Default for Sample {
    fn default() -> Self {
        Self::new(String::new(), Time::now(), 0.0)
    }
}
