//! Filters on the text of the event message

use crate::core::{Filter, FilterResult, LogEvent, Result};
use serde::{Deserialize, Serialize};

/// The comparison a [`MessageFilter`] performs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCondition {
    Contains(String),
    Equals(String),
    NotContains(String),
    NotEquals(String),
}

/// Returns its `action` when the condition holds for the event message,
/// [`FilterResult::Neutral`] otherwise.
///
/// # Example
///
/// ```
/// use rust_log_router::prelude::*;
/// use rust_log_router::filters::MessageFilter;
///
/// let filter = MessageFilter::when_contains("password", FilterResult::Reject).ignore_case(true);
/// let event = LogEvent::new("Auth", LogLevel::Info, "PASSWORD reset requested");
/// assert_eq!(filter.evaluate(&event).unwrap(), FilterResult::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFilter {
    condition: MessageCondition,
    ignore_case: bool,
    action: FilterResult,
}

impl MessageFilter {
    pub fn new(condition: MessageCondition, action: FilterResult) -> Self {
        Self {
            condition,
            ignore_case: false,
            action,
        }
    }

    pub fn when_contains(text: impl Into<String>, action: FilterResult) -> Self {
        Self::new(MessageCondition::Contains(text.into()), action)
    }

    pub fn when_equal(text: impl Into<String>, action: FilterResult) -> Self {
        Self::new(MessageCondition::Equals(text.into()), action)
    }

    pub fn when_not_contains(text: impl Into<String>, action: FilterResult) -> Self {
        Self::new(MessageCondition::NotContains(text.into()), action)
    }

    pub fn when_not_equal(text: impl Into<String>, action: FilterResult) -> Self {
        Self::new(MessageCondition::NotEquals(text.into()), action)
    }

    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn condition(&self) -> &MessageCondition {
        &self.condition
    }

    pub fn action(&self) -> FilterResult {
        self.action
    }

    fn holds(&self, message: &str) -> bool {
        let text = match &self.condition {
            MessageCondition::Contains(text)
            | MessageCondition::Equals(text)
            | MessageCondition::NotContains(text)
            | MessageCondition::NotEquals(text) => text.as_str(),
        };

        if self.ignore_case {
            self.compare(&message.to_lowercase(), &text.to_lowercase())
        } else {
            self.compare(message, text)
        }
    }

    fn compare(&self, message: &str, text: &str) -> bool {
        match self.condition {
            MessageCondition::Contains(_) => message.contains(text),
            MessageCondition::Equals(_) => message == text,
            MessageCondition::NotContains(_) => !message.contains(text),
            MessageCondition::NotEquals(_) => message != text,
        }
    }
}

impl Filter for MessageFilter {
    fn evaluate(&self, event: &LogEvent) -> Result<FilterResult> {
        if self.holds(&event.message) {
            Ok(self.action)
        } else {
            Ok(FilterResult::Neutral)
        }
    }

    fn name(&self) -> &str {
        match self.condition {
            MessageCondition::Contains(_) => "when_contains",
            MessageCondition::Equals(_) => "when_equal",
            MessageCondition::NotContains(_) => "when_not_contains",
            MessageCondition::NotEquals(_) => "when_not_equal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn event(message: &str) -> LogEvent {
        LogEvent::new("App", LogLevel::Info, message)
    }

    #[test]
    fn test_contains() {
        let filter = MessageFilter::when_contains("token", FilterResult::Reject);
        assert_eq!(filter.evaluate(&event("token=abc")).unwrap(), FilterResult::Reject);
        assert_eq!(filter.evaluate(&event("TOKEN=abc")).unwrap(), FilterResult::Neutral);
        assert_eq!(filter.name(), "when_contains");
    }

    #[test]
    fn test_ignore_case() {
        let filter = MessageFilter::when_equal("ping", FilterResult::Reject).ignore_case(true);
        assert_eq!(filter.evaluate(&event("PING")).unwrap(), FilterResult::Reject);
        assert_eq!(filter.evaluate(&event("ping pong")).unwrap(), FilterResult::Neutral);
    }

    #[test]
    fn test_negated_conditions() {
        let filter = MessageFilter::when_not_contains("order", FilterResult::Reject);
        assert_eq!(filter.evaluate(&event("heartbeat")).unwrap(), FilterResult::Reject);
        assert_eq!(filter.evaluate(&event("order 7 placed")).unwrap(), FilterResult::Neutral);

        let filter = MessageFilter::when_not_equal("ready", FilterResult::Accept);
        assert_eq!(filter.evaluate(&event("starting")).unwrap(), FilterResult::Accept);
        assert_eq!(filter.evaluate(&event("ready")).unwrap(), FilterResult::Neutral);
    }

    #[test]
    fn test_case_sensitivity_per_condition() {
        let exact = MessageFilter::when_not_equal("Ready", FilterResult::Reject);
        assert_eq!(exact.evaluate(&event("ready")).unwrap(), FilterResult::Reject);
        assert_eq!(exact.evaluate(&event("Ready")).unwrap(), FilterResult::Neutral);

        let folded = MessageFilter::when_not_contains("Order", FilterResult::Reject).ignore_case(true);
        assert_eq!(folded.evaluate(&event("ORDER 7")).unwrap(), FilterResult::Neutral);
        assert_eq!(folded.evaluate(&event("heartbeat")).unwrap(), FilterResult::Reject);
    }
}
