use serde::Serialize;

use crate::common::report_error::ReportError;

/// Values accumulated for one series, in the shape the chart renderer reads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDataset {
    pub label: String,
    pub axis_id: String,
    pub render_kind: String,
    /// One entry per cycle the series received data; may be shorter than the labels
    pub values: Vec<f64>,
}

/// Read-only copy of an aggregator's output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSnapshot {
    pub labels: Vec<String>,
    pub datasets: Vec<AggregatedDataset>,
}

impl ChartSnapshot {
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
