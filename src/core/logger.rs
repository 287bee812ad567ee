//! Logger front end: dispatch plus target invocation
//!
//! [`LogFactory`] owns the [`RuleDispatcher`] and hands out named
//! [`Logger`]s. A logger turns a call into a [`LogEvent`], asks the
//! dispatcher for targets and writes the event to each of them. Failures
//! of filters and targets never reach application code through
//! [`Logger::log`]; the [`FailurePolicy`] decides what happens instead.

use super::{
    dispatcher::{RuleDispatcher, RuleSet},
    error::{Result, RouterError},
    log_context::LogContext,
    log_event::LogEvent,
    log_level::LogLevel,
    logging_rule::LoggingRule,
    metrics::DispatchMetrics,
    target::TargetRef,
};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// What to do when a filter or target fails while an event is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop writing the current event to any further target
    Abort,
    /// Skip the failing target and keep writing to the others
    Skip,
    /// Like `Skip`, and report the failure on stderr and through the callback
    #[default]
    Report,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "Abort"),
            FailurePolicy::Skip => write!(f, "Skip"),
            FailurePolicy::Report => write!(f, "Report"),
        }
    }
}

/// Callback for dispatch failures (only called under [`FailurePolicy::Report`])
pub type FailureCallback = Arc<dyn Fn(&RouterError) + Send + Sync>;

struct FactoryShared {
    dispatcher: RuleDispatcher,
    metrics: DispatchMetrics,
    failure_policy: FailurePolicy,
    on_failure: Option<FailureCallback>,
}

impl FactoryShared {
    fn report(&self, err: &RouterError) {
        if self.failure_policy != FailurePolicy::Report {
            return;
        }
        eprintln!("[LOGGER ERROR] {}", err);
        if let Some(ref callback) = self.on_failure {
            callback(err);
        }
    }

    /// Write `event` to one target with panic isolation
    fn write_isolated(target: &TargetRef, event: &LogEvent) -> Result<()> {
        match catch_unwind(AssertUnwindSafe(|| target.write(event))) {
            Ok(result) => result,
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                eprintln!(
                    "[LOGGER CRITICAL] Target '{}' panicked: {}. \
                     Other targets continue to function.",
                    target.name(),
                    panic_msg
                );
                Err(RouterError::target(target.name(), format!("panicked: {}", panic_msg)))
            }
        }
    }

    fn dispatch(&self, event: &LogEvent) -> Result<usize> {
        let selection = match self
            .dispatcher
            .select_targets(&event.logger_name, event.level, event)
        {
            Ok(selection) => selection,
            Err(err) => {
                self.metrics.record_filter_failure();
                self.report(&err);
                return Err(err);
            }
        };

        if selection.is_empty() {
            self.metrics.record_unrouted();
            return Ok(0);
        }

        let mut written = 0;
        let mut first_error = None;

        for target in &selection.targets {
            match Self::write_isolated(target, event) {
                Ok(()) => {
                    self.metrics.record_target_write();
                    written += 1;
                }
                Err(err) => {
                    self.metrics.record_target_failure();
                    self.report(&err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    if self.failure_policy == FailurePolicy::Abort {
                        break;
                    }
                }
            }
        }

        if written > 0 {
            self.metrics.record_routed();
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    /// Flush every target of the active rules; the first error is returned
    /// after all targets have been tried.
    fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for target in self.dispatcher.snapshot().all_targets() {
            let result = catch_unwind(AssertUnwindSafe(|| target.flush())).unwrap_or_else(|panic_info| {
                Err(RouterError::target(
                    target.name(),
                    format!("panicked during flush: {}", panic_message(panic_info.as_ref())),
                ))
            });
            if let Err(err) = result {
                eprintln!("[LOGGER ERROR] Target '{}' flush failed: {}", target.name(), err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for FactoryShared {
    fn drop(&mut self) {
        // flush() already reports each failure on stderr
        let _ = self.flush();

        let failures = self.metrics.target_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Log factory shutting down with {} failed target writes (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Owns the active rules and creates loggers bound to them.
///
/// Cloning a factory is cheap; clones share rules, metrics and policy.
/// Targets are flushed when the last clone (and the last logger) is dropped.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryTarget::new("memory"));
/// let factory = LogFactory::builder()
///     .rule(LoggingRule::with_min_level("App.*", LogLevel::Info, memory.clone()))
///     .build();
///
/// let logger = factory.logger("App.Billing");
/// logger.info("invoice sent");
/// logger.debug("not routed");
///
/// assert_eq!(memory.len(), 1);
/// ```
#[derive(Clone)]
pub struct LogFactory {
    shared: Arc<FactoryShared>,
}

impl LogFactory {
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self::builder().rule_set(rules).build()
    }

    /// Create a builder for LogFactory
    #[must_use]
    pub fn builder() -> LogFactoryBuilder {
        LogFactoryBuilder::new()
    }

    /// A logger writing under `name`
    pub fn logger(&self, name: impl Into<String>) -> Logger {
        Logger {
            name: Arc::from(name.into()),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Atomically replace the active rules
    pub fn reconfigure(&self, rules: RuleSet) {
        self.shared.dispatcher.reconfigure(rules);
    }

    /// The rules in effect right now
    pub fn rules(&self) -> Arc<RuleSet> {
        self.shared.dispatcher.snapshot()
    }

    pub fn dispatcher(&self) -> &RuleDispatcher {
        &self.shared.dispatcher
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.shared.metrics
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.shared.failure_policy
    }

    /// Route a prepared event and write it to the selected targets.
    ///
    /// Returns how many targets accepted the write.
    ///
    /// # Errors
    ///
    /// The filter error that aborted selection, or the first target failure.
    pub fn dispatch(&self, event: &LogEvent) -> Result<usize> {
        self.shared.dispatch(event)
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.flush()
    }
}

impl fmt::Debug for LogFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFactory")
            .field("dispatcher", &self.shared.dispatcher)
            .field("failure_policy", &self.shared.failure_policy)
            .finish()
    }
}

impl Default for LogFactory {
    fn default() -> Self {
        Self::new(RuleSet::empty())
    }
}

/// Builder for constructing LogFactory with a fluent API
///
/// # Example
/// ```
/// use rust_log_router::prelude::*;
/// use std::sync::Arc;
///
/// let factory = LogFactory::builder()
///     .rule(LoggingRule::with_min_level("*", LogLevel::Warn, Arc::new(ConsoleTarget::new())))
///     .failure_policy(FailurePolicy::Report)
///     .on_failure(Arc::new(|err: &RouterError| {
///         eprintln!("ALERT: {}", err);
///     }))
///     .build();
/// ```
pub struct LogFactoryBuilder {
    rules: Vec<LoggingRule>,
    failure_policy: FailurePolicy,
    on_failure: Option<FailureCallback>,
}

impl LogFactoryBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            failure_policy: FailurePolicy::Report,
            on_failure: None,
        }
    }

    /// Append a top-level rule
    #[must_use = "builder methods return a new value"]
    pub fn rule(mut self, rule: LoggingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append every rule of `rules`, keeping their order
    #[must_use = "builder methods return a new value"]
    pub fn rule_set(mut self, rules: RuleSet) -> Self {
        self.rules.extend(rules.rules().iter().cloned());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set a callback for reported failures
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    pub fn build(self) -> LogFactory {
        LogFactory {
            shared: Arc::new(FactoryShared {
                dispatcher: RuleDispatcher::new(RuleSet::new(self.rules)),
                metrics: DispatchMetrics::new(),
                failure_policy: self.failure_policy,
                on_failure: self.on_failure,
            }),
        }
    }
}

impl Default for LogFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A named logger bound to a [`LogFactory`]
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    shared: Arc<FactoryShared>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any active rule routes `level` for this logger
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shared.dispatcher.is_enabled(&self.name, level)
    }

    /// Log `message`; failures are handled by the factory's policy
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        let _ = self.try_log(level, message);
    }

    /// Log `message` and return how many targets accepted it
    pub fn try_log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<usize> {
        let event = LogEvent::new(self.name.as_ref(), level, message);
        self.shared.dispatch(&event)
    }

    /// Log with structured context fields
    pub fn log_with_context(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        let event = LogEvent::new(self.name.as_ref(), level, message).with_context(context);
        let _ = self.shared.dispatch(&event);
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FilterResult, Target};
    use crate::filters::FnFilter;
    use crate::targets::MemoryTarget;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct FailingTarget;

    impl Target for FailingTarget {
        fn write(&self, _event: &LogEvent) -> Result<()> {
            Err(RouterError::target("failing", "disk full"))
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingTarget;

    impl Target for PanickingTarget {
        fn write(&self, _event: &LogEvent) -> Result<()> {
            panic!("target exploded");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn factory_with(policy: FailurePolicy, broken: TargetRef, healthy: Arc<MemoryTarget>) -> LogFactory {
        LogFactory::builder()
            .rule(
                LoggingRule::new("*")
                    .min_level(LogLevel::Trace)
                    .target(broken)
                    .target(healthy),
            )
            .failure_policy(policy)
            .build()
    }

    #[test]
    fn test_logger_routes_by_name_and_level() {
        let memory = Arc::new(MemoryTarget::new("memory"));
        let factory = LogFactory::builder()
            .rule(LoggingRule::with_min_level("App.*", LogLevel::Info, memory.clone()))
            .build();

        factory.logger("App.Web").info("served");
        factory.logger("App.Web").debug("too verbose");
        factory.logger("Lib").error("other logger");

        assert_eq!(memory.messages(), vec!["served".to_string()]);
        assert_eq!(factory.metrics().events_routed(), 1);
        assert_eq!(factory.metrics().events_unrouted(), 2);
    }

    #[test]
    fn test_skip_policy_keeps_writing_after_failure() {
        let healthy = Arc::new(MemoryTarget::new("healthy"));
        let factory = factory_with(FailurePolicy::Skip, Arc::new(FailingTarget), healthy.clone());

        let result = factory.logger("App").try_log(LogLevel::Info, "hello");
        assert!(matches!(result, Err(RouterError::TargetFailed { .. })));
        assert_eq!(healthy.len(), 1);
        assert_eq!(factory.metrics().target_failures(), 1);
        assert_eq!(factory.metrics().target_writes(), 1);
    }

    #[test]
    fn test_abort_policy_stops_after_failure() {
        let healthy = Arc::new(MemoryTarget::new("healthy"));
        let factory = factory_with(FailurePolicy::Abort, Arc::new(FailingTarget), healthy.clone());

        factory.logger("App").info("hello");
        assert!(healthy.is_empty());
        assert_eq!(factory.metrics().events_routed(), 0);
    }

    #[test]
    fn test_panicking_target_is_isolated() {
        let healthy = Arc::new(MemoryTarget::new("healthy"));
        let factory = factory_with(FailurePolicy::Skip, Arc::new(PanickingTarget), healthy.clone());

        factory.logger("App").info("survives");
        assert_eq!(healthy.messages(), vec!["survives".to_string()]);
        assert_eq!(factory.metrics().target_failures(), 1);
    }

    #[test]
    fn test_report_policy_invokes_callback() {
        let reported = Arc::new(AtomicU64::new(0));
        let reported_clone = Arc::clone(&reported);

        let factory = LogFactory::builder()
            .rule(LoggingRule::with_min_level("*", LogLevel::Trace, Arc::new(FailingTarget)))
            .on_failure(Arc::new(move |_err: &RouterError| {
                reported_clone.fetch_add(1, Ordering::Relaxed);
            }))
            .build();

        factory.logger("App").warn("first");
        factory.logger("App").warn("second");
        assert_eq!(reported.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_filter_failure_drops_event() {
        let memory = Arc::new(MemoryTarget::new("memory"));
        let factory = LogFactory::builder()
            .rule(
                LoggingRule::with_min_level("*", LogLevel::Trace, memory.clone()).filter(Arc::new(
                    FnFilter::fallible("broken", |_| Err(RouterError::filter("broken", "boom"))),
                )),
            )
            .failure_policy(FailurePolicy::Skip)
            .build();

        let result = factory.logger("App").try_log(LogLevel::Info, "lost");
        assert!(matches!(result, Err(RouterError::FilterFailed { .. })));
        assert!(memory.is_empty());
        assert_eq!(factory.metrics().filter_failures(), 1);
    }

    #[test]
    fn test_reconfigure_applies_to_existing_loggers() {
        let first = Arc::new(MemoryTarget::new("first"));
        let second = Arc::new(MemoryTarget::new("second"));
        let factory = LogFactory::new(RuleSet::new(vec![LoggingRule::with_min_level(
            "*",
            LogLevel::Trace,
            first.clone(),
        )]));
        let logger = factory.logger("App");

        logger.info("one");
        factory.reconfigure(RuleSet::new(vec![LoggingRule::with_min_level(
            "*",
            LogLevel::Trace,
            second.clone(),
        )]));
        logger.info("two");

        assert_eq!(first.messages(), vec!["one".to_string()]);
        assert_eq!(second.messages(), vec!["two".to_string()]);
    }

    #[test]
    fn test_is_enabled_and_context() {
        let memory = Arc::new(MemoryTarget::new("memory"));
        let factory = LogFactory::builder()
            .rule(
                LoggingRule::with_min_level("*", LogLevel::Info, memory.clone())
                    .filter(Arc::new(FnFilter::new("neutral", |_| FilterResult::Neutral))),
            )
            .build();
        let logger = factory.logger("App");

        assert!(logger.is_enabled(LogLevel::Info));
        assert!(!logger.is_enabled(LogLevel::Debug));

        logger.log_with_context(
            LogLevel::Info,
            "order placed",
            LogContext::new().with_field("order_id", 42),
        );
        let events = memory.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].logger_name, "App");
        assert!(events[0].property("order_id").is_some());
    }
}
