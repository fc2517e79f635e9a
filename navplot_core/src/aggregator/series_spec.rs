use serde::Deserialize;
use std::collections::HashMap;

use crate::common::{
    enums::{AxisSide, RenderAs},
    report_error::{ErrCode, ReportError},
};

/// How one named series is drawn and on which axis
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub show: String,
    #[serde(default = "default_render_as")]
    pub render_as: RenderAs,
    #[serde(default = "default_axis_side")]
    pub axis_side: AxisSide,
}

fn default_render_as() -> RenderAs {
    RenderAs::Line
}

fn default_axis_side() -> AxisSide {
    AxisSide::Left
}

impl SeriesSpec {
    pub fn new(show: impl Into<String>, render_as: RenderAs, axis_side: AxisSide) -> Self {
        Self {
            show: show.into(),
            render_as,
            axis_side,
        }
    }

    /// Parse literal names, rejecting any that is not `LINE`/`BAR` or `LEFT`/`RIGHT`.
    pub fn parse(show: &str, render_as: &str, axis_side: &str) -> Result<Self, ReportError> {
        let spec = Self::lenient(show, render_as, axis_side);
        spec.validate()?;
        Ok(spec)
    }

    /// Parse literal names, keeping unrecognized ones for the aggregator to degrade.
    pub fn lenient(show: &str, render_as: &str, axis_side: &str) -> Self {
        Self::new(
            show,
            RenderAs::from(render_as.to_string()),
            AxisSide::from(axis_side.to_string()),
        )
    }

    /// Lenient parse of a chart element's `show`, `renderAs` and `axisSide` attributes.
    pub fn from_attributes(attrs: &HashMap<String, String>) -> Self {
        let get = |key: &str| attrs.get(key).map(String::as_str);
        Self {
            show: get("show").unwrap_or_default().to_string(),
            render_as: get("renderAs").map_or_else(default_render_as, |v| RenderAs::from(v.to_string())),
            axis_side: get("axisSide").map_or_else(default_axis_side, |v| AxisSide::from(v.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.show.trim().is_empty() {
            return Err(ReportError::config("series spec has no show name"));
        }
        if let RenderAs::Unrecognized(literal) = &self.render_as {
            return Err(ReportError::new(
                format!("unknown renderAs literal {:?} for {}", literal, self.show),
                ErrCode::UnknownEnumLiteral,
            ));
        }
        if let AxisSide::Unrecognized(literal) = &self.axis_side {
            return Err(ReportError::new(
                format!("unknown axisSide literal {:?} for {}", literal, self.show),
                ErrCode::UnknownEnumLiteral,
            ));
        }
        Ok(())
    }
}
