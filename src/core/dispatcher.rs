//! Rule dispatch: choosing the targets for an event
//!
//! [`RuleSet`] is an immutable, ordered list of top-level rules and owns
//! the selection walk. [`RuleDispatcher`] holds the rule set currently in
//! effect and swaps it atomically on reconfiguration; every call works on
//! the snapshot it loaded at entry.

use super::{
    error::Result,
    log_event::LogEvent,
    log_level::LogLevel,
    logging_rule::LoggingRule,
    target::{same_target, TargetRef},
};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Targets chosen for one event
#[derive(Clone, Default)]
pub struct TargetSelection {
    /// Distinct targets in first-encountered order
    pub targets: Vec<TargetRef>,
    /// A final top-level rule matched and cut the walk short
    pub stopped: bool,
}

impl TargetSelection {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Target names in selection order
    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    fn push_unique(&mut self, target: &TargetRef) {
        if !self.targets.iter().any(|t| same_target(t, target)) {
            self.targets.push(Arc::clone(target));
        }
    }
}

impl fmt::Debug for TargetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSelection")
            .field("targets", &self.names())
            .field("stopped", &self.stopped)
            .finish()
    }
}

/// An immutable tree of logging rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<LoggingRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<LoggingRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[LoggingRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Select the targets that should receive `event` from logger `logger_name`
    /// at `level`.
    ///
    /// Rules are visited in order. A rule whose name pattern does not match is
    /// skipped together with its children. A matching rule contributes its
    /// targets when `level` is enabled and its filters accept the event; its
    /// children are then visited with the same inputs. A matching final rule
    /// ends the walk of its own sequence.
    ///
    /// # Errors
    ///
    /// A failing filter aborts the walk and its error is returned.
    pub fn select_targets(
        &self,
        logger_name: &str,
        level: LogLevel,
        event: &LogEvent,
    ) -> Result<TargetSelection> {
        let mut selection = TargetSelection::default();
        selection.stopped = Self::walk(&self.rules, logger_name, level, event, &mut selection)?;
        Ok(selection)
    }

    fn walk(
        rules: &[LoggingRule],
        logger_name: &str,
        level: LogLevel,
        event: &LogEvent,
        selection: &mut TargetSelection,
    ) -> Result<bool> {
        for rule in rules {
            if !rule.name_matches(logger_name) {
                continue;
            }

            if rule.is_enabled_for_level(level) && rule.accepts(event)? {
                for target in rule.targets() {
                    selection.push_unique(target);
                }
            }

            // A final child only stops its own siblings.
            Self::walk(rule.child_rules(), logger_name, level, event, selection)?;

            if rule.is_final() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether any rule would route `level` for `logger_name`, ignoring filters
    pub fn is_enabled(&self, logger_name: &str, level: LogLevel) -> bool {
        Self::any_enabled(&self.rules, logger_name, level)
    }

    fn any_enabled(rules: &[LoggingRule], logger_name: &str, level: LogLevel) -> bool {
        for rule in rules {
            if !rule.name_matches(logger_name) {
                continue;
            }
            if rule.is_enabled_for_level(level) && !rule.targets().is_empty() {
                return true;
            }
            if Self::any_enabled(rule.child_rules(), logger_name, level) {
                return true;
            }
            if rule.is_final() {
                return false;
            }
        }
        false
    }

    /// Every distinct target referenced anywhere in the tree
    pub fn all_targets(&self) -> Vec<TargetRef> {
        let mut selection = TargetSelection::default();
        let mut pending: Vec<&LoggingRule> = self.rules.iter().rev().collect();
        while let Some(rule) = pending.pop() {
            for target in rule.targets() {
                selection.push_unique(target);
            }
            pending.extend(rule.child_rules().iter().rev());
        }
        selection.targets
    }
}

impl From<Vec<LoggingRule>> for RuleSet {
    fn from(rules: Vec<LoggingRule>) -> Self {
        Self::new(rules)
    }
}

/// Holds the active [`RuleSet`] and swaps it atomically.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let console: TargetRef = Arc::new(MemoryTarget::new("console"));
/// let dispatcher = RuleDispatcher::new(RuleSet::new(vec![
///     LoggingRule::with_min_level("*", LogLevel::Info, console),
/// ]));
///
/// let event = LogEvent::new("App", LogLevel::Warn, "disk almost full");
/// let selection = dispatcher.select_targets("App", LogLevel::Warn, &event).unwrap();
/// assert_eq!(selection.names(), vec!["console"]);
///
/// dispatcher.reconfigure(RuleSet::empty());
/// let selection = dispatcher.select_targets("App", LogLevel::Warn, &event).unwrap();
/// assert!(selection.is_empty());
/// ```
pub struct RuleDispatcher {
    rules: ArcSwap<RuleSet>,
}

impl RuleDispatcher {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: ArcSwap::from_pointee(rules),
        }
    }

    /// Replace the active rules. Dispatches already in flight finish
    /// against the rules they started with.
    pub fn reconfigure(&self, rules: RuleSet) {
        self.rules.store(Arc::new(rules));
    }

    /// The rule set in effect right now
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.rules.load_full()
    }

    pub fn select_targets(
        &self,
        logger_name: &str,
        level: LogLevel,
        event: &LogEvent,
    ) -> Result<TargetSelection> {
        self.rules.load().select_targets(logger_name, level, event)
    }

    pub fn is_enabled(&self, logger_name: &str, level: LogLevel) -> bool {
        self.rules.load().is_enabled(logger_name, level)
    }
}

impl Default for RuleDispatcher {
    fn default() -> Self {
        Self::new(RuleSet::empty())
    }
}

impl fmt::Debug for RuleDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDispatcher")
            .field("rules", &self.rules.load().rules().len())
            .finish()
    }
}
