//! Renderers for the fields carried by every event

use super::LayoutRenderer;
use crate::core::LogEvent;
use std::fmt::Write;

/// Renders the event level, optionally padded to five columns and colored
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelRenderer {
    padded: bool,
    colored: bool,
}

impl LevelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn padded(mut self, padded: bool) -> Self {
        self.padded = padded;
        self
    }

    /// Color the level with ANSI escapes (needs the `console` feature)
    #[must_use = "builder methods return a new value"]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }
}

impl LayoutRenderer for LevelRenderer {
    fn append(&self, out: &mut String, event: &LogEvent) {
        let text = if self.padded {
            format!("{:5}", event.level.to_str())
        } else {
            event.level.to_str().to_string()
        };

        #[cfg(feature = "console")]
        {
            if self.colored {
                use colored::Colorize;
                let _ = write!(out, "{}", text.color(event.level.color_code()));
                return;
            }
        }

        out.push_str(&text);
    }

    fn name(&self) -> &str {
        "level"
    }
}

/// Renders the logger name, or only its last `.` segment
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerNameRenderer {
    short_name: bool,
}

impl LoggerNameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn short_name(mut self, short_name: bool) -> Self {
        self.short_name = short_name;
        self
    }
}

impl LayoutRenderer for LoggerNameRenderer {
    fn append(&self, out: &mut String, event: &LogEvent) {
        let name = event.logger_name.as_str();
        if self.short_name {
            out.push_str(name.rsplit('.').next().unwrap_or(name));
        } else {
            out.push_str(name);
        }
    }

    fn name(&self) -> &str {
        "logger"
    }
}

/// Renders the (sanitized) message
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageRenderer;

impl LayoutRenderer for MessageRenderer {
    fn append(&self, out: &mut String, event: &LogEvent) {
        out.push_str(&event.message);
    }

    fn name(&self) -> &str {
        "message"
    }
}

/// Renders the thread name, falling back to the thread id
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRenderer;

impl LayoutRenderer for ThreadRenderer {
    fn append(&self, out: &mut String, event: &LogEvent) {
        out.push_str(event.thread_label());
    }

    fn name(&self) -> &str {
        "thread"
    }
}

/// Renders structured context as sorted `key=value` pairs.
///
/// Renders nothing, prefix included, when the event has no context.
#[derive(Debug, Clone, Default)]
pub struct ContextRenderer {
    prefix: String,
}

impl ContextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl LayoutRenderer for ContextRenderer {
    fn append(&self, out: &mut String, event: &LogEvent) {
        if let Some(context) = event.context.as_ref().filter(|ctx| !ctx.is_empty()) {
            let _ = write!(out, "{}{}", self.prefix, context.format_fields());
        }
    }

    fn name(&self) -> &str {
        "context"
    }
}
