//! Per-level enablement mask used by logging rules

use super::log_level::LogLevel;
use std::fmt;

/// Fixed-size set of enabled levels, indexed by [`LogLevel::ordinal`].
///
/// The table always holds exactly [`LogLevel::COUNT`] slots and starts
/// with every level disabled.
///
/// # Example
///
/// ```
/// use rust_log_router::{LevelSet, LogLevel};
///
/// let mut levels = LevelSet::from_min(LogLevel::Warn);
/// assert!(levels.is_enabled(LogLevel::Error));
/// assert!(!levels.is_enabled(LogLevel::Info));
///
/// levels.disable(LogLevel::Fatal);
/// assert_eq!(levels.levels(), vec![LogLevel::Warn, LogLevel::Error]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSet {
    enabled: [bool; LogLevel::COUNT],
}

impl LevelSet {
    /// A set with no level enabled
    pub const fn empty() -> Self {
        Self {
            enabled: [false; LogLevel::COUNT],
        }
    }

    /// A set with every level enabled
    pub const fn all() -> Self {
        Self {
            enabled: [true; LogLevel::COUNT],
        }
    }

    /// Enable `min` and every level above it
    pub fn from_min(min: LogLevel) -> Self {
        let mut set = Self::empty();
        set.enable_range(min, LogLevel::MAX);
        set
    }

    /// Enable every level in `min..=max`; an inverted range enables nothing
    pub fn range(min: LogLevel, max: LogLevel) -> Self {
        let mut set = Self::empty();
        set.enable_range(min, max);
        set
    }

    #[inline]
    pub fn enable(&mut self, level: LogLevel) {
        self.enabled[level.ordinal()] = true;
    }

    #[inline]
    pub fn disable(&mut self, level: LogLevel) {
        self.enabled[level.ordinal()] = false;
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.enabled[level.ordinal()]
    }

    pub fn enable_range(&mut self, min: LogLevel, max: LogLevel) {
        for level in LogLevel::ALL {
            if level >= min && level <= max {
                self.enable(level);
            }
        }
    }

    /// Replace the whole set: clear every slot, then enable `levels`
    pub fn set_levels<I>(&mut self, levels: I)
    where
        I: IntoIterator<Item = LogLevel>,
    {
        self.enabled = [false; LogLevel::COUNT];
        for level in levels {
            self.enable(level);
        }
    }

    /// Enabled levels in ordinal order
    pub fn levels(&self) -> Vec<LogLevel> {
        LogLevel::ALL
            .into_iter()
            .filter(|level| self.is_enabled(*level))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|enabled| *enabled)
    }

    pub fn len(&self) -> usize {
        self.enabled.iter().filter(|enabled| **enabled).count()
    }
}

impl FromIterator<LogLevel> for LevelSet {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.set_levels(iter);
        set
    }
}

impl fmt::Display for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for level in self.levels() {
            write!(f, "{} ", level)?;
        }
        write!(f, "]")
    }
}
