//! Counter renderer
//!
//! Emits an integer that advances by `increment` on every render. Without a
//! sequence name the renderer keeps its own counter; with one, every
//! renderer naming the same sequence draws from a shared
//! [`SequenceRegistry`] entry, so their values never repeat.

use super::LayoutRenderer;
use crate::core::{LogEvent, SequenceRegistry};
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub const DEFAULT_COUNTER_VALUE: i64 = 1;
pub const DEFAULT_COUNTER_INCREMENT: i64 = 1;

/// Renders `value, value + increment, ...`
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use rust_log_router::renderers::CounterRenderer;
/// use std::sync::Arc;
///
/// let registry = Arc::new(SequenceRegistry::new());
/// let a = CounterRenderer::new().sequence("requests").registry(Arc::clone(&registry));
/// let b = CounterRenderer::new().sequence("requests").registry(Arc::clone(&registry));
///
/// let event = LogEvent::new("App", LogLevel::Info, "x");
/// assert_eq!(a.render(&event), "1");
/// assert_eq!(b.render(&event), "2");
/// ```
pub struct CounterRenderer {
    value: i64,
    increment: i64,
    sequence: Option<String>,
    // None means the process-wide registry
    registry: Option<Arc<SequenceRegistry>>,
    next: AtomicI64,
}

impl CounterRenderer {
    pub fn new() -> Self {
        Self {
            value: DEFAULT_COUNTER_VALUE,
            increment: DEFAULT_COUNTER_INCREMENT,
            sequence: None,
            registry: None,
            next: AtomicI64::new(DEFAULT_COUNTER_VALUE),
        }
    }

    /// Initial value of the counter
    #[must_use = "builder methods return a new value"]
    pub fn value(mut self, value: i64) -> Self {
        self.value = value;
        self.next = AtomicI64::new(value);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn increment(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }

    /// Share the counter with every renderer naming the same sequence
    #[must_use = "builder methods return a new value"]
    pub fn sequence(mut self, name: impl Into<String>) -> Self {
        self.sequence = Some(name.into());
        self
    }

    /// Draw sequences from `registry` instead of [`SequenceRegistry::global`]
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<SequenceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn sequence_name(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// Produce the next counter value
    pub fn next_value(&self) -> i64 {
        match &self.sequence {
            Some(name) => {
                let registry = match &self.registry {
                    Some(registry) => registry.as_ref(),
                    None => SequenceRegistry::global(),
                };
                registry.get_and_advance(name, self.value, self.increment)
            }
            // fetch_add on AtomicI64 wraps like the registry does
            None => self.next.fetch_add(self.increment, Ordering::Relaxed),
        }
    }
}

impl Default for CounterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutRenderer for CounterRenderer {
    fn append(&self, out: &mut String, _event: &LogEvent) {
        let _ = write!(out, "{}", self.next_value());
    }

    fn name(&self) -> &str {
        "counter"
    }
}

impl fmt::Debug for CounterRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterRenderer")
            .field("value", &self.value)
            .field("increment", &self.increment)
            .field("sequence", &self.sequence)
            .field("shared_registry", &self.registry.is_some())
            .finish()
    }
}
