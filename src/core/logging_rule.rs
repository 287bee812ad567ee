//! Logging rules: the nodes of the routing tree
//!
//! A rule couples a logger name pattern with a level mask, an ordered
//! filter chain, a list of targets and nested child rules. Rules are
//! assembled by whoever loads configuration and are read-only once they
//! are handed to a [`RuleSet`](super::RuleSet).

use super::{
    error::Result,
    filter::{Filter, FilterResult},
    level_set::LevelSet,
    log_event::LogEvent,
    log_level::LogLevel,
    name_matcher::{MatchMode, NameMatcher},
    target::{same_target, TargetRef},
};
use std::fmt;
use std::sync::Arc;

/// A single routing rule.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let audit: TargetRef = Arc::new(MemoryTarget::new("audit"));
///
/// let rule = LoggingRule::new("App.Security.*")
///     .min_level(LogLevel::Warn)
///     .target(audit)
///     .final_rule(true);
///
/// assert!(rule.name_matches("App.Security.Login"));
/// assert!(rule.is_enabled_for_level(LogLevel::Error));
/// assert!(!rule.is_enabled_for_level(LogLevel::Info));
/// ```
#[derive(Clone, Default)]
pub struct LoggingRule {
    matcher: NameMatcher,
    levels: LevelSet,
    filters: Vec<Arc<dyn Filter>>,
    targets: Vec<TargetRef>,
    child_rules: Vec<LoggingRule>,
    is_final: bool,
}

impl LoggingRule {
    /// Create a rule for `pattern` with no levels, targets, filters or children
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            matcher: NameMatcher::new(pattern),
            ..Default::default()
        }
    }

    /// Create a rule writing `min_level` and above to a single target
    pub fn with_min_level(pattern: impl Into<String>, min_level: LogLevel, target: TargetRef) -> Self {
        Self::new(pattern).min_level(min_level).target(target)
    }

    /// Enable `level` and every level above it
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.levels.enable_range(level, LogLevel::MAX);
        self
    }

    /// Enable every level in `min..=max`
    #[must_use = "builder methods return a new value"]
    pub fn level_range(mut self, min: LogLevel, max: LogLevel) -> Self {
        self.levels.enable_range(min, max);
        self
    }

    /// Replace the level mask with exactly `levels`
    #[must_use = "builder methods return a new value"]
    pub fn levels<I>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = LogLevel>,
    {
        self.levels.set_levels(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn target(mut self, target: TargetRef) -> Self {
        self.add_target(target);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn child(mut self, rule: LoggingRule) -> Self {
        self.child_rules.push(rule);
        self
    }

    /// Stop evaluating later sibling rules once this one matches a name
    #[must_use = "builder methods return a new value"]
    pub fn final_rule(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    /// Replace the name pattern; the match mode is recompiled
    pub fn set_name_pattern(&mut self, pattern: impl Into<String>) {
        self.matcher = NameMatcher::new(pattern);
    }

    pub fn enable_level(&mut self, level: LogLevel) {
        self.levels.enable(level);
    }

    pub fn disable_level(&mut self, level: LogLevel) {
        self.levels.disable(level);
    }

    pub fn set_levels<I>(&mut self, levels: I)
    where
        I: IntoIterator<Item = LogLevel>,
    {
        self.levels.set_levels(levels);
    }

    /// Add a target; a target already on this rule is not added twice
    pub fn add_target(&mut self, target: TargetRef) {
        if !self.targets.iter().any(|t| same_target(t, &target)) {
            self.targets.push(target);
        }
    }

    pub fn add_filter(&mut self, filter: Arc<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn add_child(&mut self, rule: LoggingRule) {
        self.child_rules.push(rule);
    }

    pub fn set_final(&mut self, is_final: bool) {
        self.is_final = is_final;
    }

    pub fn name_pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.matcher.mode()
    }

    pub fn match_argument(&self) -> &str {
        self.matcher.argument()
    }

    pub fn level_set(&self) -> &LevelSet {
        &self.levels
    }

    /// Enabled levels in ordinal order
    pub fn enabled_levels(&self) -> Vec<LogLevel> {
        self.levels.levels()
    }

    pub fn targets(&self) -> &[TargetRef] {
        &self.targets
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    pub fn child_rules(&self) -> &[LoggingRule] {
        &self.child_rules
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    #[inline]
    pub fn name_matches(&self, logger_name: &str) -> bool {
        self.matcher.matches(logger_name)
    }

    #[inline]
    pub fn is_enabled_for_level(&self, level: LogLevel) -> bool {
        self.levels.is_enabled(level)
    }

    /// Run the filter chain; the first non-neutral result wins.
    ///
    /// # Errors
    ///
    /// Returns the first filter error unchanged.
    pub fn evaluate_filters(&self, event: &LogEvent) -> Result<FilterResult> {
        for filter in &self.filters {
            let result = filter.evaluate(event)?;
            if result != FilterResult::Neutral {
                return Ok(result);
            }
        }
        Ok(FilterResult::Neutral)
    }

    /// Whether the filter chain lets `event` through to this rule's targets
    pub fn accepts(&self, event: &LogEvent) -> Result<bool> {
        Ok(self.evaluate_filters(event)? != FilterResult::Reject)
    }
}

impl fmt::Display for LoggingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logNamePattern: {} levels: {} appendTo: [ ", self.matcher, self.levels)?;
        for target in &self.targets {
            write!(f, "{} ", target.name())?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for LoggingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingRule")
            .field("pattern", &self.matcher.pattern())
            .field("mode", &self.matcher.mode())
            .field("levels", &self.levels.levels())
            .field(
                "filters",
                &self.filters.iter().map(|fl| fl.name()).collect::<Vec<_>>(),
            )
            .field(
                "targets",
                &self.targets.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("final", &self.is_final)
            .field("child_rules", &self.child_rules)
            .finish()
    }
}
