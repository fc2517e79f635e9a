use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

use super::report_error::{ErrCode, ReportError};

/// How a series is drawn by the chart renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(from = "String")]
pub enum RenderAs {
    Line,
    Bar,
    /// Literal handed in by the markup layer that names no known kind
    #[strum(default)]
    Unrecognized(String),
}

impl RenderAs {
    /// Render-kind tag understood by the chart renderer, "" when unrecognized.
    pub fn render_kind(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Unrecognized(_) => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

/// Which y axis a series is plotted against
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(from = "String")]
pub enum AxisSide {
    Left,
    Right,
    #[strum(default)]
    Unrecognized(String),
}

impl AxisSide {
    /// Stable axis identifier, "" when unrecognized.
    pub fn axis_id(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Unrecognized(_) => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for RenderAs {
    fn from(literal: String) -> Self {
        literal
            .parse()
            .unwrap_or_else(|_| Self::Unrecognized(literal))
    }
}

impl From<String> for AxisSide {
    fn from(literal: String) -> Self {
        literal
            .parse()
            .unwrap_or_else(|_| Self::Unrecognized(literal))
    }
}

/// Unit a preprocessor window is expressed in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Day,
    Month,
    Year,
}

/// Online transform a preprocessor applies to its upstream series
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreprocessorKind {
    MovingAverage,
    Regression,
    LocallyWeightedRegression,
    RunningAverage,
    StdDev,
}

/// Parse an enum literal by its exact (case-sensitive) name.
pub fn parse_literal<T: FromStr>(field: &str, value: &str) -> Result<T, ReportError> {
    value.parse::<T>().map_err(|_| {
        ReportError::new(
            format!("unknown {} literal: {:?}", field, value),
            ErrCode::UnknownEnumLiteral,
        )
    })
}
