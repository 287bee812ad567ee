//! Error types for the routing core

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Severity ordinal outside `0..=LogLevel::MAX_ORDINAL`
    #[error("Invalid log level ordinal {ordinal} (max is {max})")]
    InvalidLevelOrdinal { ordinal: usize, max: usize },

    /// Unparseable level name
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Rule refers to a target name nobody registered
    #[error("Unknown target '{name}'")]
    UnknownTarget { name: String },

    /// Filter evaluation failed
    #[error("Filter '{filter}' failed: {message}")]
    FilterFailed { filter: String, message: String },

    /// Target write or flush failed
    #[error("Target '{target}' failed: {message}")]
    TargetFailed { target: String, message: String },

    /// Queue full with buffer details
    #[error("Target queue full: {current}/{max} events buffered")]
    QueueFull { current: usize, max: usize },

    /// Channel send error
    #[error("Failed to send log event to async worker")]
    ChannelSendError,

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl RouterError {
    /// Create an invalid level ordinal error
    pub fn level_ordinal(ordinal: usize, max: usize) -> Self {
        RouterError::InvalidLevelOrdinal { ordinal, max }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        RouterError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown target error
    pub fn unknown_target(name: impl Into<String>) -> Self {
        RouterError::UnknownTarget { name: name.into() }
    }

    /// Create a filter failure
    pub fn filter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        RouterError::FilterFailed {
            filter: filter.into(),
            message: message.into(),
        }
    }

    /// Create a target failure
    pub fn target(target: impl Into<String>, message: impl Into<String>) -> Self {
        RouterError::TargetFailed {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        RouterError::QueueFull { current, max }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RouterError::Other(msg.into())
    }
}
