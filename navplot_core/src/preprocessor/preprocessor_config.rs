use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::{
    enums::{parse_literal, TimeUnit},
    report_error::ReportError,
};

/// Configuration shared by every preprocessor kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessorConfig {
    /// Upstream series the preprocessor reads from
    #[serde(default)]
    pub source: String,

    /// Window length, in `window_unit`s; must be at least 1
    #[serde(default)]
    pub window_size: i64,

    #[serde(default = "default_unit", alias = "unitOfTime")]
    pub window_unit: TimeUnit,

    /// Series name the derived samples are published under
    #[serde(default)]
    pub output: String,
}

fn default_unit() -> TimeUnit {
    TimeUnit::Day
}

impl PreprocessorConfig {
    pub fn new(
        source: impl Into<String>,
        window_size: i64,
        window_unit: TimeUnit,
        output: impl Into<String>,
    ) -> Result<Self, ReportError> {
        let config = Self {
            source: source.into(),
            window_size,
            window_unit,
            output: output.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from the raw string attributes of a chart element.
    ///
    /// Recognised keys: `source`, `windowSize`, `windowUnit` (or `unitOfTime`)
    /// and `output`. A missing unit defaults to `DAY`.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Result<Self, ReportError> {
        let window_size = match attrs.get("windowSize") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                ReportError::config(format!("windowSize is not an integer: {:?}", raw))
            })?,
            None => 0,
        };

        let window_unit = match attrs.get("windowUnit").or_else(|| attrs.get("unitOfTime")) {
            Some(literal) => parse_literal::<TimeUnit>("windowUnit", literal)?,
            None => default_unit(),
        };

        Self::new(
            attrs.get("source").cloned().unwrap_or_default(),
            window_size,
            window_unit,
            attrs.get("output").cloned().unwrap_or_default(),
        )
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.source.trim().is_empty() {
            return Err(ReportError::config("preprocessor source is missing"));
        }
        if self.output.trim().is_empty() {
            return Err(ReportError::config(format!(
                "preprocessor reading {} has no output name",
                self.source
            )));
        }
        if self.window_size < 1 {
            return Err(ReportError::config(format!(
                "window size must be positive, got {}",
                self.window_size
            )));
        }
        if self.source == self.output {
            return Err(ReportError::config(format!(
                "preprocessor cannot read and publish the same series {}",
                self.source
            )));
        }
        Ok(())
    }
}
