//! Filter trait for per-event gating of a matched rule

use super::{error::Result, log_event::LogEvent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single filter.
///
/// A rule's chain stops at the first non-`Neutral` result; a chain where
/// every filter is `Neutral` accepts the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterResult {
    /// No opinion, ask the next filter
    #[default]
    Neutral,
    /// Write the event to the rule's targets
    Accept,
    /// Do not write the event to the rule's targets
    Reject,
}

impl fmt::Display for FilterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterResult::Neutral => write!(f, "Neutral"),
            FilterResult::Accept => write!(f, "Accept"),
            FilterResult::Reject => write!(f, "Reject"),
        }
    }
}

/// A predicate attached to a logging rule.
///
/// Filters run on the dispatching thread and must be cheap; an `Err` is
/// not caught by the dispatcher and aborts selection for the event.
///
/// # Example
///
/// ```
/// use rust_log_router::{Filter, FilterResult, LogEvent, Result};
///
/// struct DropHealthChecks;
///
/// impl Filter for DropHealthChecks {
///     fn evaluate(&self, event: &LogEvent) -> Result<FilterResult> {
///         if event.message.starts_with("GET /health") {
///             Ok(FilterResult::Reject)
///         } else {
///             Ok(FilterResult::Neutral)
///         }
///     }
///
///     fn name(&self) -> &str {
///         "drop_health_checks"
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    fn evaluate(&self, event: &LogEvent) -> Result<FilterResult>;
    fn name(&self) -> &str;
}
