//! Closure-backed filters

use crate::core::{Filter, FilterResult, LogEvent, Result};
use std::fmt;

type FilterFn = Box<dyn Fn(&LogEvent) -> Result<FilterResult> + Send + Sync>;

/// Adapts a closure into a [`Filter`].
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use rust_log_router::filters::FnFilter;
///
/// let no_health_checks = FnFilter::new("no-health", |event| {
///     if event.message.starts_with("GET /health") {
///         FilterResult::Reject
///     } else {
///         FilterResult::Neutral
///     }
/// });
///
/// let event = LogEvent::new("Http", LogLevel::Info, "GET /health 200");
/// assert_eq!(no_health_checks.evaluate(&event).unwrap(), FilterResult::Reject);
/// ```
pub struct FnFilter {
    name: String,
    func: FilterFn,
}

impl FnFilter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&LogEvent) -> FilterResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(move |event| Ok(func(event))),
        }
    }

    /// Filter whose closure may fail
    pub fn fallible<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<FilterResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl Filter for FnFilter {
    fn evaluate(&self, event: &LogEvent) -> Result<FilterResult> {
        (self.func)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}
