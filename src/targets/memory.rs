//! In-memory target, mostly for tests and diagnostics

use crate::core::{LogEvent, Result, Target};
use crate::renderers::Layout;
use parking_lot::Mutex;

/// Keeps every event it receives, and optionally the rendered line.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryTarget::new("memory"));
/// let factory = LogFactory::new(RuleSet::new(vec![
///     LoggingRule::with_min_level("*", LogLevel::Info, memory.clone()),
/// ]));
///
/// factory.logger("App").info("hello");
/// assert_eq!(memory.messages(), vec!["hello".to_string()]);
/// ```
pub struct MemoryTarget {
    name: String,
    layout: Option<Layout>,
    events: Mutex<Vec<LogEvent>>,
    lines: Mutex<Vec<String>>,
}

impl MemoryTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: None,
            events: Mutex::new(Vec::new()),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Also render each event with `layout`, see [`MemoryTarget::lines`]
    #[must_use = "builder methods return a new value"]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Rendered lines; empty unless a layout was set
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
        self.lines.lock().clear();
    }
}

impl Target for MemoryTarget {
    fn write(&self, event: &LogEvent) -> Result<()> {
        if let Some(layout) = &self.layout {
            let line = layout.render(event);
            self.lines.lock().push(line);
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MemoryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTarget")
            .field("name", &self.name)
            .field("events", &self.len())
            .finish()
    }
}
