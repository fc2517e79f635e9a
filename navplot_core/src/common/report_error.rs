use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the reporting pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Configuration errors (0-99)
    #[strum(serialize = "_CONFIG_ERR_BEGIN")]
    ConfigErrBegin = 0,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 1,
    #[strum(serialize = "UNKNOWN_ENUM_LITERAL")]
    UnknownEnumLiteral = 2,
    #[strum(serialize = "DUPLICATE_SERIES")]
    DuplicateSeries = 3,
    #[strum(serialize = "DUPLICATE_OUTPUT")]
    DuplicateOutput = 4,
    #[strum(serialize = "CONFIG_FORMAT_ERROR")]
    ConfigFormatError = 5,
    #[strum(serialize = "_CONFIG_ERR_END")]
    ConfigErrEnd = 99,

    // Cycle errors (100-199)
    #[strum(serialize = "_CYCLE_ERR_BEGIN")]
    CycleErrBegin = 100,
    #[strum(serialize = "CYCLE_ALREADY_OPEN")]
    CycleAlreadyOpen = 101,
    #[strum(serialize = "NO_OPEN_CYCLE")]
    NoOpenCycle = 102,
    #[strum(serialize = "UNKNOWN_SOURCE")]
    UnknownSource = 103,
    #[strum(serialize = "CYCLE_ALREADY_REPORTED")]
    CycleAlreadyReported = 104,
    #[strum(serialize = "_CYCLE_ERR_END")]
    CycleErrEnd = 199,
}

impl ErrCode {
    pub fn is_config_err(&self) -> bool {
        let code = *self as i32;
        code > Self::ConfigErrBegin as i32 && code < Self::ConfigErrEnd as i32
    }

    pub fn is_cycle_err(&self) -> bool {
        let code = *self as i32;
        code > Self::CycleErrBegin as i32 && code < Self::CycleErrEnd as i32
    }
}

#[derive(Debug, Error)]
#[error("{errcode}: {msg}")]
pub struct ReportError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl ReportError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    /// Shorthand for the generic `CONFIG_ERROR` raised by invalid preprocessor settings.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::ConfigError)
    }

    pub fn is_config_err(&self) -> bool {
        self.errcode.is_config_err()
    }

    pub fn is_cycle_err(&self) -> bool {
        self.errcode.is_cycle_err()
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string(), ErrCode::ConfigFormatError)
    }
}
