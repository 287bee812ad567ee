//! Console target implementation

use crate::core::{LogEvent, LogLevel, Result, Target};
use crate::renderers::{
    ContextRenderer, DateRenderer, Layout, LevelRenderer, LoggerNameRenderer, MessageRenderer,
    ThreadRenderer, TimestampFormat,
};
use std::io::Write;

/// Writes rendered events to stdout, Error and Fatal to stderr.
pub struct ConsoleTarget {
    name: String,
    use_colors: bool,
    layout: Layout,
}

impl ConsoleTarget {
    pub fn new() -> Self {
        Self::with_colors(cfg!(feature = "console"))
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            name: "console".to_string(),
            use_colors,
            layout: Self::default_layout(use_colors, TimestampFormat::default()),
        }
    }

    /// `[<timestamp>] [<LEVEL>] <thread> <logger> - <message> <context>`
    fn default_layout(use_colors: bool, timestamp_format: TimestampFormat) -> Layout {
        Layout::new()
            .text("[")
            .renderer(DateRenderer::new(timestamp_format))
            .text("] [")
            .renderer(LevelRenderer::new().padded(true).colored(use_colors))
            .text("] ")
            .renderer(ThreadRenderer)
            .text(" ")
            .renderer(LoggerNameRenderer::new())
            .text(" - ")
            .renderer(MessageRenderer)
            .renderer(ContextRenderer::new().prefix(" "))
    }

    /// Name used in rule configuration
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::targets::ConsoleTarget;
    ///
    /// let target = ConsoleTarget::new().with_name("stdout");
    /// ```
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the line layout
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::targets::ConsoleTarget;
    /// use rust_log_router::renderers::{Layout, CounterRenderer, MessageRenderer};
    ///
    /// let target = ConsoleTarget::new().with_layout(
    ///     Layout::new().renderer(CounterRenderer::new()).text(": ").renderer(MessageRenderer),
    /// );
    /// ```
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Keep the default layout but change the timestamp format
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_router::targets::ConsoleTarget;
    /// use rust_log_router::renderers::TimestampFormat;
    ///
    /// let target = ConsoleTarget::with_colors(false)
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.layout = Self::default_layout(self.use_colors, format);
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn format(&self, event: &LogEvent) -> String {
        self.layout.render(event)
    }
}

impl Default for ConsoleTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for ConsoleTarget {
    fn write(&self, event: &LogEvent) -> Result<()> {
        let output = self.format(event);

        // Error and Fatal go to stderr, the rest to stdout
        match event.level {
            LogLevel::Error | LogLevel::Fatal => {
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "{}", output)?;
            }
            _ => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", output)?;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
