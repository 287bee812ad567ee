//! # Rust Log Router
//!
//! The routing core of a structured logging library: a tree of logging
//! rules decides, per event, which targets receive it.
//!
//! ## Features
//!
//! - **Rule Trees**: name patterns with `*`, per-level masks, filter chains,
//!   `final` rules and nested child rules
//! - **Atomic Reconfiguration**: the whole rule tree is swapped in one step;
//!   in-flight events finish against the tree they started with
//! - **Shared Sequences**: a thread-safe registry of named counters for
//!   counter renderers
//! - **Failure Isolation**: failing or panicking targets never stop the others
//! - **Declarative Configuration**: rule trees from JSON
//!
//! ## Example
//!
//! ```
//! use rust_log_router::prelude::*;
//! use std::sync::Arc;
//!
//! let errors = Arc::new(MemoryTarget::new("errors"));
//! let everything = Arc::new(MemoryTarget::new("everything"));
//!
//! let factory = LogFactory::new(RuleSet::new(vec![
//!     LoggingRule::with_min_level("App.Db*", LogLevel::Error, errors.clone()).final_rule(true),
//!     LoggingRule::with_min_level("*", LogLevel::Info, everything.clone()),
//! ]));
//!
//! factory.logger("App.Db").error("connection lost");
//! factory.logger("App.Web").info("request served");
//!
//! assert_eq!(errors.messages(), vec!["connection lost".to_string()]);
//! assert_eq!(everything.messages(), vec!["request served".to_string()]);
//! ```

pub mod config;
pub mod core;
pub mod filters;
pub mod macros;
pub mod renderers;
pub mod targets;

pub mod prelude {
    pub use crate::config::{LoggingConfig, TargetRegistry};
    pub use crate::core::{
        FailurePolicy, FieldValue, Filter, FilterResult, LevelSet, LogContext, LogEvent,
        LogFactory, LogLevel, Logger, LoggingRule, MatchMode, OverflowPolicy, Result,
        RouterError, RuleDispatcher, RuleSet, SequenceRegistry, Target, TargetRef,
    };
    pub use crate::renderers::LayoutRenderer;
    pub use crate::targets::{AsyncTargetWrapper, ConsoleTarget, MemoryTarget};
}

pub use crate::core::{
    same_target, DispatchMetrics, FailureCallback, FailurePolicy, FieldValue, Filter,
    FilterResult, LevelSet, LogContext, LogEvent, LogFactory, LogFactoryBuilder, LogLevel,
    Logger, LoggingRule, MatchMode, NameMatcher, OverflowCallback, OverflowPolicy, Result,
    RouterError, RuleDispatcher, RuleSet, SequenceRegistry, Target, TargetRef, TargetSelection,
};
pub use targets::{ConsoleTarget, MemoryTarget};
