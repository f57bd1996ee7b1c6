//! Construction options
//!
//! `LoggerOptions` mirrors the recognised construction keys so a logger can be
//! configured from JSON. Function-valued settings (output, serializers,
//! sinks) only exist on [`LoggerBuilder`](super::logger::LoggerBuilder).

use super::error::Result;
use super::level::Level;
use serde::{Deserialize, Serialize};

/// Whether log calls run to completion inline or return a future
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sync,
    Async,
}

/// Pretty rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrettyOptions {
    pub no_timestamp: bool,
    pub no_filename: bool,
    /// Render the header line only, without context and event
    pub only_message: bool,
    pub no_color: bool,
}

impl PrettyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn no_timestamp(mut self) -> Self {
        self.no_timestamp = true;
        self
    }

    #[must_use]
    pub fn no_filename(mut self) -> Self {
        self.no_filename = true;
        self
    }

    #[must_use]
    pub fn only_message(mut self) -> Self {
        self.only_message = true;
        self
    }

    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }
}

/// `prettyPrint` accepts either a flag or an options object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrettyPrint {
    Enabled(bool),
    Options(PrettyOptions),
}

impl PrettyPrint {
    pub fn into_options(self) -> Option<PrettyOptions> {
        match self {
            PrettyPrint::Enabled(true) => Some(PrettyOptions::default()),
            PrettyPrint::Enabled(false) => None,
            PrettyPrint::Options(options) => Some(options),
        }
    }
}

/// Severity threshold, by level name or numeric severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MinLevel {
    Level(Level),
    Severity(u8),
}

impl MinLevel {
    /// Records with a numerically greater severity are dropped
    pub fn threshold(self) -> u8 {
        match self {
            MinLevel::Level(level) => level.severity(),
            MinLevel::Severity(severity) => severity,
        }
    }
}

impl From<Level> for MinLevel {
    fn from(level: Level) -> Self {
        MinLevel::Level(level)
    }
}

impl From<u8> for MinLevel {
    fn from(severity: u8) -> Self {
        MinLevel::Severity(severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerOptions {
    pub app_name: Option<String>,
    pub hostname: Option<String>,
    pub pretty_print: Option<PrettyPrint>,
    #[serde(rename = "async")]
    pub async_mode: bool,
    pub object_mode: bool,
    pub min_level: Option<MinLevel>,
}

impl LoggerOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
