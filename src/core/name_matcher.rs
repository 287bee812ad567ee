//! Logger name patterns
//!
//! A pattern may carry the `*` wildcard at the start, at the end, or at
//! both ends. The pattern is classified once, when it is set, and every
//! lookup afterwards is a single ordinal string comparison.
//!
//! | Pattern   | Mode         | Argument |
//! |-----------|--------------|----------|
//! | `App.Db`  | `Equals`     | `App.Db` |
//! | `App.*`   | `StartsWith` | `App.`   |
//! | `*.Db`    | `EndsWith`   | `.Db`    |
//! | `*Db*`    | `Contains`   | `Db`     |
//! | `*`       | `All`        |          |
//! | `A*b*c`   | `None`       |          |

use std::fmt;

pub const WILDCARD: char = '*';

/// How a logger name is compared against the compiled pattern argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Every name matches
    #[default]
    All,
    /// No name matches (malformed pattern)
    None,
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchMode::All => "All",
            MatchMode::None => "None",
            MatchMode::Equals => "Equals",
            MatchMode::StartsWith => "StartsWith",
            MatchMode::EndsWith => "EndsWith",
            MatchMode::Contains => "Contains",
        };
        f.write_str(name)
    }
}

/// A compiled logger name pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatcher {
    pattern: String,
    mode: MatchMode,
    argument: String,
}

impl NameMatcher {
    /// Compile `pattern`. Never fails: patterns with a wildcard anywhere
    /// other than the edges compile to [`MatchMode::None`].
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let (mode, argument) = Self::classify(&pattern);
        Self {
            pattern,
            mode,
            argument,
        }
    }

    /// A matcher that accepts every name
    pub fn any() -> Self {
        Self {
            pattern: WILDCARD.to_string(),
            mode: MatchMode::All,
            argument: String::new(),
        }
    }

    fn classify(pattern: &str) -> (MatchMode, String) {
        let (first, last) = match (pattern.find(WILDCARD), pattern.rfind(WILDCARD)) {
            (Some(first), Some(last)) => (first, last),
            _ => return (MatchMode::Equals, pattern.to_string()),
        };

        if first == last {
            let before = &pattern[..first];
            let after = &pattern[first + WILDCARD.len_utf8()..];

            // Text after the marker is ignored once a prefix exists: "Foo*Bar" acts as "Foo*".
            if !before.is_empty() {
                return (MatchMode::StartsWith, before.to_string());
            }
            if !after.is_empty() {
                return (MatchMode::EndsWith, after.to_string());
            }
            return (MatchMode::All, String::new());
        }

        let wildcards = pattern.matches(WILDCARD).count();
        let tail = pattern.len() - WILDCARD.len_utf8();
        if first == 0 && last == tail && wildcards == 2 {
            let inner = &pattern[WILDCARD.len_utf8()..tail];
            return (MatchMode::Contains, inner.to_string());
        }

        (MatchMode::None, String::new())
    }

    /// Check whether `name` matches this pattern
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        match self.mode {
            MatchMode::All => true,
            MatchMode::None => false,
            MatchMode::Equals => name == self.argument,
            MatchMode::StartsWith => name.starts_with(self.argument.as_str()),
            MatchMode::EndsWith => name.ends_with(self.argument.as_str()),
            MatchMode::Contains => name.contains(self.argument.as_str()),
        }
    }

    /// The pattern as configured
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The text compared against names; empty for `All` and `None`
    pub fn argument(&self) -> &str {
        &self.argument
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.argument, self.mode)
    }
}
