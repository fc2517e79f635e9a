use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::aggregator::{SeriesAggregator, SeriesSpec};
use crate::common::{
    enums::PreprocessorKind,
    report_error::{ErrCode, ReportError},
};
use crate::preprocessor::{Preprocessor, PreprocessorConfig, WindowCalendar};
use crate::report::ReportingSession;

/// One derived series: its kind plus the shared preprocessor settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreprocessorDef {
    pub kind: PreprocessorKind,
    #[serde(flatten)]
    pub config: PreprocessorConfig,
}

/// Dashboard reporting configuration.
///
/// ```json
/// {
///   "feeds": ["MACD.NAV", "MACD.COST"],
///   "preprocessors": [
///     {"kind": "REGRESSION", "source": "MACD.NAV", "windowSize": 3,
///      "windowUnit": "YEAR", "output": "PERFORMANCE3"}
///   ],
///   "series": [
///     {"show": "MACD.NAV", "renderAs": "LINE", "axisSide": "LEFT"},
///     {"show": "PERFORMANCE3", "renderAs": "BAR", "axisSide": "RIGHT"}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Raw series the driver feeds, in reporting order
    #[serde(default)]
    pub feeds: Vec<String>,
    /// Derived series, reported after the feeds in dependency order
    #[serde(default)]
    pub preprocessors: Vec<PreprocessorDef>,
    /// Charted series, in rendering order
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ReportError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReportError::new(
                format!("cannot read {}: {}", path.display(), e),
                ErrCode::ConfigFormatError,
            )
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        let mut outputs = HashSet::new();
        for feed in &self.feeds {
            if feed.trim().is_empty() {
                return Err(ReportError::config("feed series has no name"));
            }
            if !outputs.insert(feed.as_str()) {
                return Err(ReportError::new(
                    format!("feed {} declared twice", feed),
                    ErrCode::DuplicateOutput,
                ));
            }
        }

        for def in &self.preprocessors {
            def.config.validate()?;
            if !outputs.insert(def.config.output.as_str()) {
                return Err(ReportError::new(
                    format!("output {} is already published", def.config.output),
                    ErrCode::DuplicateOutput,
                ));
            }
        }

        self.reporting_order()?;

        let mut shown = HashSet::new();
        for spec in &self.series {
            spec.validate()?;
            if !shown.insert(spec.show.as_str()) {
                return Err(ReportError::new(
                    format!("series {} registered twice", spec.show),
                    ErrCode::DuplicateSeries,
                ));
            }
        }
        Ok(())
    }

    /// Preprocessors ordered so each one follows the preprocessor publishing
    /// its source. Ties keep declaration order; a dependency cycle is an error.
    pub fn reporting_order(&self) -> Result<Vec<&PreprocessorDef>, ReportError> {
        let mut pending: Vec<&PreprocessorDef> = self.preprocessors.iter().collect();
        let mut ordered = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|def| {
                !pending
                    .iter()
                    .any(|other| other.config.output == def.config.source)
            });
            let Some(idx) = ready else {
                let outputs: Vec<&str> = pending.iter().map(|d| d.config.output.as_str()).collect();
                return Err(ReportError::config(format!(
                    "preprocessors {} read each other in a cycle",
                    outputs.join(", ")
                )));
            };
            ordered.push(pending.remove(idx));
        }
        Ok(ordered)
    }

    /// Build the session (feeds first, then preprocessors in dependency
    /// order) and the aggregator.
    pub fn build(
        &self,
        calendar: &dyn WindowCalendar,
    ) -> Result<(ReportingSession, SeriesAggregator), ReportError> {
        let mut session = ReportingSession::new();
        for feed in &self.feeds {
            session.register_feed(feed.clone())?;
        }
        for def in self.reporting_order()? {
            let preprocessor = Preprocessor::new(def.kind, def.config.clone(), calendar)?;
            debug!(view = ?preprocessor.describe(), "configured preprocessor");
            session.register(Box::new(preprocessor))?;
        }

        let aggregator = SeriesAggregator::new(self.series.iter().cloned())?;
        Ok((session, aggregator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{
        enums::{AxisSide, RenderAs, TimeUnit},
        sample::Sample,
        time::Time,
    };
    use crate::preprocessor::TradingCalendar;

    const DASHBOARD: &str = r#"{
        "feeds": ["MACD.NAV", "MACD.COST"],
        "preprocessors": [
            {"kind": "MOVING_AVERAGE", "source": "MACD.NAV", "windowSize": 2,
             "unitOfTime": "DAY", "output": "NAV.SMA2"},
            {"kind": "REGRESSION", "source": "MACD.NAV", "windowSize": 3,
             "windowUnit": "YEAR", "output": "PERFORMANCE3"}
        ],
        "series": [
            {"show": "MACD.NAV", "renderAs": "LINE", "axisSide": "LEFT"},
            {"show": "NAV.SMA2", "renderAs": "LINE", "axisSide": "LEFT"},
            {"show": "MACD.COST", "renderAs": "BAR", "axisSide": "RIGHT"}
        ]
    }"#;

    #[test]
    fn test_parse_dashboard() {
        let config = ReportConfig::from_json_str(DASHBOARD).unwrap();
        assert_eq!(config.feeds, vec!["MACD.NAV", "MACD.COST"]);
        assert_eq!(config.preprocessors[0].kind, PreprocessorKind::MovingAverage);
        assert_eq!(
            config.preprocessors[1].config,
            PreprocessorConfig::new("MACD.NAV", 3, TimeUnit::Year, "PERFORMANCE3").unwrap()
        );
        assert_eq!(
            config.series[2],
            SeriesSpec::new("MACD.COST", RenderAs::Bar, AxisSide::Right)
        );
    }

    #[test]
    fn test_build_and_run() {
        let config = ReportConfig::from_json_str(DASHBOARD).unwrap();
        let (mut session, mut aggregator) = config.build(&TradingCalendar::default()).unwrap();
        assert_eq!(
            session.provider_names(),
            vec!["MACD.NAV", "MACD.COST", "NAV.SMA2", "PERFORMANCE3"]
        );

        for (day, nav, cost) in [(2, 100.0, 90.0), (3, 104.0, 90.0), (4, 98.0, 91.0)] {
            let t = Time::from_ymd(2024, 1, day).unwrap();
            session.feed(Sample::new("MACD.NAV", t, nav)).unwrap();
            session.feed(Sample::new("MACD.COST", t, cost)).unwrap();
            session.run_cycle(t, &mut aggregator).unwrap();
        }

        assert_eq!(aggregator.labels(), &["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(aggregator.dataset("MACD.NAV").unwrap().values, vec![100.0, 104.0, 98.0]);
        assert_eq!(aggregator.dataset("NAV.SMA2").unwrap().values, vec![100.0, 102.0, 100.0]);
        assert_eq!(aggregator.dataset("MACD.COST").unwrap().values, vec![90.0, 90.0, 91.0]);
        // PERFORMANCE3 is computed but not charted
        assert_eq!(aggregator.dropped_samples(), 3);
    }

    #[test]
    fn test_chain_declared_in_reverse() {
        let json = r#"{
            "feeds": ["NAV"],
            "preprocessors": [
                {"kind": "MOVING_AVERAGE", "source": "SMA2", "windowSize": 2, "output": "SMA2_OF_SMA2"},
                {"kind": "MOVING_AVERAGE", "source": "NAV", "windowSize": 2, "output": "SMA2"}
            ],
            "series": [{"show": "SMA2"}, {"show": "SMA2_OF_SMA2"}]
        }"#;
        let config = ReportConfig::from_json_str(json).unwrap();
        let (mut session, mut aggregator) = config.build(&TradingCalendar::default()).unwrap();
        assert_eq!(session.provider_names(), vec!["NAV", "SMA2", "SMA2_OF_SMA2"]);

        for (day, nav) in [(2, 1.0), (3, 2.0), (4, 3.0)] {
            let t = Time::from_ymd(2024, 1, day).unwrap();
            session.feed(Sample::new("NAV", t, nav)).unwrap();
            session.run_cycle(t, &mut aggregator).unwrap();
        }

        assert_eq!(aggregator.dataset("SMA2").unwrap().values, vec![1.0, 1.5, 2.25]);
        assert_eq!(
            aggregator.dataset("SMA2_OF_SMA2").unwrap().values,
            vec![1.0, 1.25, 1.75]
        );
    }

    #[test]
    fn test_dependency_cycle_rejected() {
        let json = r#"{"preprocessors": [
            {"kind": "MOVING_AVERAGE", "source": "B", "windowSize": 2, "output": "A"},
            {"kind": "STD_DEV", "source": "A", "windowSize": 1, "output": "B"}
        ]}"#;
        let err = ReportConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_invalid_preprocessor_is_config_error() {
        let json = r#"{"preprocessors": [
            {"kind": "REGRESSION", "source": "MACD.NAV", "windowSize": -1, "output": "P"}
        ]}"#;
        let err = ReportConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);

        let json = r#"{"preprocessors": [{"kind": "REGRESSION", "windowSize": 3, "output": "P"}]}"#;
        let err = ReportConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_unknown_literals_rejected() {
        let json = r#"{"series": [{"show": "NAV", "renderAs": "line"}]}"#;
        let err = ReportConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.errcode, ErrCode::UnknownEnumLiteral);

        let json = r#"{"preprocessors": [
            {"kind": "KALMAN", "source": "NAV", "windowSize": 3, "output": "P"}
        ]}"#;
        let err = ReportConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigFormatError);
    }

    #[test]
    fn test_duplicates_rejected() {
        let json = r#"{"feeds": ["NAV"], "preprocessors": [
            {"kind": "STD_DEV", "source": "COST", "windowSize": 1, "output": "NAV"}
        ]}"#;
        assert_eq!(
            ReportConfig::from_json_str(json).unwrap_err().errcode,
            ErrCode::DuplicateOutput
        );

        let json = r#"{"series": [{"show": "NAV"}, {"show": "NAV", "renderAs": "BAR"}]}"#;
        assert_eq!(
            ReportConfig::from_json_str(json).unwrap_err().errcode,
            ErrCode::DuplicateSeries
        );
    }

    #[test]
    fn test_from_value_and_empty() {
        let config = ReportConfig::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config, ReportConfig::default());
        assert!(ReportConfig::from_json_str("{").unwrap_err().is_config_err());
    }
}
