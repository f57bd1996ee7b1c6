//! Severity table
//!
//! Eight syslog-style levels. Sequence matters: the declaration order is the
//! severity, so `Emergency` (0) is the most severe and `Debug` (7) the least.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warn = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Level {
    /// All levels, most severe first
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warn,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    /// Numeric severity, the index of this level in [`Level::ALL`]
    #[inline]
    pub const fn severity(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Look a level up by its numeric severity
    pub fn from_severity(severity: u8) -> Option<Self> {
        Self::ALL.get(severity as usize).copied()
    }

    /// Icon used by the pretty renderer
    pub const fn icon(self) -> &'static str {
        match self {
            Level::Emergency => "●",
            Level::Alert => "◆",
            Level::Critical => "✖",
            Level::Error => "■",
            Level::Warn => "⚠",
            Level::Notice => "▶",
            Level::Info => "ℹ",
            Level::Debug => "★",
        }
    }

    /// Whether a record of this level passes the given severity threshold
    #[inline]
    pub fn passes(self, threshold: u8) -> bool {
        self.severity() <= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "emergency" => Ok(Level::Emergency),
            "alert" => Ok(Level::Alert),
            "critical" => Ok(Level::Critical),
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "notice" => Ok(Level::Notice),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

impl TryFrom<&str> for Level {
    type Error = LoggerError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
