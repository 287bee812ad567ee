//! Layout renderers
//!
//! A [`LayoutRenderer`] appends one piece of text for an event; a [`Layout`]
//! strings literals and renderers together into a full line.
//!
//! # Example
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::renderers::{CounterRenderer, Layout, LevelRenderer, MessageRenderer};
//!
//! let layout = Layout::new()
//!     .renderer(CounterRenderer::new())
//!     .text(" ")
//!     .renderer(LevelRenderer::new())
//!     .text(": ")
//!     .renderer(MessageRenderer);
//!
//! let event = LogEvent::new("App", LogLevel::Info, "started");
//! assert_eq!(layout.render(&event), "1 INFO: started");
//! assert_eq!(layout.render(&event), "2 INFO: started");
//! ```

pub mod basic;
pub mod counter;
pub mod date;
pub mod machine_name;

pub use basic::{ContextRenderer, LevelRenderer, LoggerNameRenderer, MessageRenderer, ThreadRenderer};
pub use counter::{CounterRenderer, DEFAULT_COUNTER_INCREMENT, DEFAULT_COUNTER_VALUE};
pub use date::{DateRenderer, TimestampFormat};
pub use machine_name::{machine_name, MachineNameRenderer};

use crate::core::LogEvent;
use std::fmt;
use std::sync::Arc;

/// Produces a fragment of text for an event
pub trait LayoutRenderer: Send + Sync {
    /// Append the rendered fragment to `out`
    fn append(&self, out: &mut String, event: &LogEvent);

    fn name(&self) -> &str;

    /// Render into a fresh string
    fn render(&self, event: &LogEvent) -> String {
        let mut out = String::new();
        self.append(&mut out, event);
        out
    }
}

#[derive(Clone)]
enum LayoutPart {
    Literal(String),
    Renderer(Arc<dyn LayoutRenderer>),
}

/// An ordered list of literal text and renderers
#[derive(Clone, Default)]
pub struct Layout {
    parts: Vec<LayoutPart>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<timestamp> [<LEVEL>] <logger> - <message> <context>`
    pub fn simple() -> Self {
        Self::new()
            .renderer(DateRenderer::default())
            .text(" [")
            .renderer(LevelRenderer::new().padded(true))
            .text("] ")
            .renderer(LoggerNameRenderer::new())
            .text(" - ")
            .renderer(MessageRenderer)
            .renderer(ContextRenderer::new().prefix(" "))
    }

    #[must_use = "builder methods return a new value"]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(LayoutPart::Literal(text.into()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn renderer<R: LayoutRenderer + 'static>(self, renderer: R) -> Self {
        self.shared_renderer(Arc::new(renderer))
    }

    /// Add a renderer that is also used elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_renderer(mut self, renderer: Arc<dyn LayoutRenderer>) -> Self {
        self.parts.push(LayoutPart::Renderer(renderer));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn render(&self, event: &LogEvent) -> String {
        let mut out = String::with_capacity(128);
        for part in &self.parts {
            match part {
                LayoutPart::Literal(text) => out.push_str(text),
                LayoutPart::Renderer(renderer) => renderer.append(&mut out, event),
            }
        }
        out
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .parts
            .iter()
            .map(|part| match part {
                LayoutPart::Literal(text) => format!("{:?}", text),
                LayoutPart::Renderer(renderer) => format!("${{{}}}", renderer.name()),
            })
            .collect();
        f.debug_struct("Layout").field("parts", &parts).finish()
    }
}
