//! Log level definitions

use super::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serialized as the upper-case name; deserialization accepts the same
/// spellings as [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[serde(alias = "Trace", alias = "trace")]
    Trace = 0,
    #[serde(alias = "Debug", alias = "debug")]
    Debug = 1,
    #[default]
    #[serde(alias = "Info", alias = "info")]
    Info = 2,
    #[serde(
        alias = "Warn",
        alias = "warn",
        alias = "WARNING",
        alias = "Warning",
        alias = "warning"
    )]
    Warn = 3,
    #[serde(alias = "Error", alias = "error")]
    Error = 4,
    #[serde(alias = "Fatal", alias = "fatal")]
    Fatal = 5,
}

impl LogLevel {
    /// Highest ordinal of any level
    pub const MAX_ORDINAL: usize = LogLevel::Fatal as usize;

    /// Number of distinct levels; the size of every per-level table
    pub const COUNT: usize = Self::MAX_ORDINAL + 1;

    /// All levels in ordinal order
    pub const ALL: [LogLevel; Self::COUNT] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub const MIN: LogLevel = LogLevel::Trace;
    pub const MAX: LogLevel = LogLevel::Fatal;

    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Look up a level by ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidLevelOrdinal`] when `ordinal > MAX_ORDINAL`.
    pub fn from_ordinal(ordinal: usize) -> Result<Self> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or_else(|| RouterError::level_ordinal(ordinal, Self::MAX_ORDINAL))
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = RouterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(RouterError::InvalidLevel(s.to_string())),
        }
    }
}

impl TryFrom<usize> for LogLevel {
    type Error = RouterError;

    fn try_from(ordinal: usize) -> std::result::Result<Self, RouterError> {
        Self::from_ordinal(ordinal)
    }
}
