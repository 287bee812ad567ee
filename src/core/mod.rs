//! Core routing types and traits

pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod level_set;
pub mod log_context;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod logging_rule;
pub mod metrics;
pub mod name_matcher;
pub mod overflow_policy;
pub mod sequence;
pub mod target;

pub use dispatcher::{RuleDispatcher, RuleSet, TargetSelection};
pub use error::{Result, RouterError};
pub use filter::{Filter, FilterResult};
pub use level_set::LevelSet;
pub use log_context::{FieldValue, LogContext};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{FailureCallback, FailurePolicy, LogFactory, LogFactoryBuilder, Logger};
pub use logging_rule::LoggingRule;
pub use metrics::DispatchMetrics;
pub use name_matcher::{MatchMode, NameMatcher};
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use sequence::SequenceRegistry;
pub use target::{same_target, Target, TargetRef};
