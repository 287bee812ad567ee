//! Declarative rule configuration
//!
//! A [`LoggingConfig`] describes a rule tree in JSON (or anything serde
//! reads). Targets are not described here: rules name them in `write_to`
//! and the names are resolved against a [`TargetRegistry`] when the tree is
//! built.
//!
//! # Example
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::config::{LoggingConfig, TargetRegistry};
//! use std::sync::Arc;
//!
//! let audit = Arc::new(MemoryTarget::new("audit"));
//! let registry = TargetRegistry::new().with_target(audit.clone());
//!
//! let config = LoggingConfig::from_json(r#"{
//!     "rules": [
//!         { "name": "Audit.*", "min_level": "Info", "write_to": "audit", "final": true }
//!     ]
//! }"#)?;
//!
//! let factory = LogFactory::new(config.build_rule_set(&registry)?);
//! factory.logger("Audit.Login").info("user signed in");
//! assert_eq!(audit.len(), 1);
//! # Ok::<(), rust_log_router::RouterError>(())
//! ```

use crate::core::{Filter, FilterResult, LogLevel, LoggingRule, Result, RouterError, RuleSet, TargetRef};
use crate::filters::{MessageFilter, SamplingConfig, SamplingFilter};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

fn default_pattern() -> String {
    "*".to_string()
}

fn default_action() -> FilterResult {
    FilterResult::Reject
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Rates must lie in `0.0..=1.0`; NaN is rejected too
fn check_rate(what: &str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(RouterError::config(
            "sample filter",
            format!("{} {} is outside 0.0..=1.0", what, rate),
        ))
    }
}

/// Accept either a list of names or one comma-separated string
fn deserialize_target_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct TargetNamesVisitor;

    impl<'de> Visitor<'de> for TargetNamesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of target names or a comma-separated string")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut names = Vec::new();
            while let Some(name) = seq.next_element::<String>()? {
                names.push(name);
            }
            Ok(names)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(TargetNamesVisitor)
}

/// One filter attached to a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    WhenContains {
        text: String,
        #[serde(default)]
        ignore_case: bool,
        #[serde(default = "default_action")]
        action: FilterResult,
    },
    WhenEqual {
        text: String,
        #[serde(default)]
        ignore_case: bool,
        #[serde(default = "default_action")]
        action: FilterResult,
    },
    WhenNotContains {
        text: String,
        #[serde(default)]
        ignore_case: bool,
        #[serde(default = "default_action")]
        action: FilterResult,
    },
    WhenNotEqual {
        text: String,
        #[serde(default)]
        ignore_case: bool,
        #[serde(default = "default_action")]
        action: FilterResult,
    },
    Sample(SamplingConfig),
}

impl FilterConfig {
    pub fn build(&self) -> Result<Arc<dyn Filter>> {
        let filter: Arc<dyn Filter> = match self {
            FilterConfig::WhenContains { text, ignore_case, action } => Arc::new(
                MessageFilter::when_contains(text.clone(), *action).ignore_case(*ignore_case),
            ),
            FilterConfig::WhenEqual { text, ignore_case, action } => Arc::new(
                MessageFilter::when_equal(text.clone(), *action).ignore_case(*ignore_case),
            ),
            FilterConfig::WhenNotContains { text, ignore_case, action } => Arc::new(
                MessageFilter::when_not_contains(text.clone(), *action).ignore_case(*ignore_case),
            ),
            FilterConfig::WhenNotEqual { text, ignore_case, action } => Arc::new(
                MessageFilter::when_not_equal(text.clone(), *action).ignore_case(*ignore_case),
            ),
            FilterConfig::Sample(config) => {
                check_rate("rate", config.rate)?;
                for (logger, rate) in &config.logger_rates {
                    check_rate(&format!("rate for '{}'", logger), *rate)?;
                }
                Arc::new(SamplingFilter::new(config.clone()))
            }
        };
        Ok(filter)
    }
}

/// Configuration of one rule and its children
///
/// Levels resolve in order: `level`, then `levels`, then the
/// `min_level`..=`max_level` range (defaulting to all levels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_pattern")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LogLevel>>,

    #[serde(default, deserialize_with = "deserialize_target_names")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub write_to: Vec<String>,

    #[serde(default, rename = "final", skip_serializing_if = "is_false")]
    pub is_final: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            name: default_pattern(),
            min_level: None,
            max_level: None,
            level: None,
            levels: None,
            write_to: Vec::new(),
            is_final: false,
            filters: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl RuleConfig {
    fn resolve_levels(&self) -> Result<Vec<LogLevel>> {
        if let Some(level) = self.level {
            return Ok(vec![level]);
        }
        if let Some(levels) = &self.levels {
            return Ok(levels.clone());
        }

        let min = self.min_level.unwrap_or(LogLevel::MIN);
        let max = self.max_level.unwrap_or(LogLevel::MAX);
        if min > max {
            return Err(RouterError::config(
                format!("rule '{}'", self.name),
                format!("min_level {} is above max_level {}", min, max),
            ));
        }
        Ok(LogLevel::ALL
            .iter()
            .copied()
            .filter(|level| (min..=max).contains(level))
            .collect())
    }

    /// Build the rule, resolving target names against `registry`
    pub fn build(&self, registry: &TargetRegistry) -> Result<LoggingRule> {
        let mut rule = LoggingRule::new(self.name.clone());
        rule.set_levels(self.resolve_levels()?);
        rule.set_final(self.is_final);

        for name in &self.write_to {
            rule.add_target(registry.get(name)?);
        }
        for filter in &self.filters {
            rule.add_filter(filter.build()?);
        }
        for child in &self.rules {
            rule.add_child(child.build(registry)?);
        }
        Ok(rule)
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl LoggingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the whole rule tree; the first invalid rule aborts the build
    pub fn build_rule_set(&self, registry: &TargetRegistry) -> Result<RuleSet> {
        let rules = self
            .rules
            .iter()
            .map(|rule| rule.build(registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet::new(rules))
    }
}

/// Targets available to configuration, by name
#[derive(Clone, Default)]
pub struct TargetRegistry {
    targets: HashMap<String, TargetRef>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the target's own name, replacing any previous entry
    pub fn register(&mut self, target: TargetRef) -> Option<TargetRef> {
        let name = target.name().to_string();
        self.targets.insert(name, target)
    }

    pub fn register_as(&mut self, name: impl Into<String>, target: TargetRef) -> Option<TargetRef> {
        self.targets.insert(name.into(), target)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_target(mut self, target: TargetRef) -> Self {
        self.register(target);
        self
    }

    pub fn get(&self, name: &str) -> Result<TargetRef> {
        self.targets
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::unknown_target(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("targets", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{same_target, LogEvent};
    use crate::targets::MemoryTarget;

    fn registry() -> (TargetRegistry, TargetRef, TargetRef) {
        let console: TargetRef = Arc::new(MemoryTarget::new("console"));
        let file: TargetRef = Arc::new(MemoryTarget::new("file"));
        let registry = TargetRegistry::new()
            .with_target(Arc::clone(&console))
            .with_target(Arc::clone(&file));
        (registry, console, file)
    }

    #[test]
    fn test_minimal_rule_defaults() {
        let config = LoggingConfig::from_json(r#"{ "rules": [ {} ] }"#).unwrap();
        let rule = &config.rules[0];

        assert_eq!(rule.name, "*");
        assert!(!rule.is_final);
        assert_eq!(rule.resolve_levels().unwrap(), LogLevel::ALL.to_vec());
    }

    #[test]
    fn test_level_resolution_order() {
        let rule: RuleConfig = serde_json::from_str(
            r#"{ "level": "Error", "levels": ["Info"], "min_level": "Trace" }"#,
        )
        .unwrap();
        assert_eq!(rule.resolve_levels().unwrap(), vec![LogLevel::Error]);

        let rule: RuleConfig =
            serde_json::from_str(r#"{ "levels": ["info", "FATAL"], "min_level": "Trace" }"#).unwrap();
        assert_eq!(rule.resolve_levels().unwrap(), vec![LogLevel::Info, LogLevel::Fatal]);

        let rule: RuleConfig =
            serde_json::from_str(r#"{ "min_level": "Info", "max_level": "Error" }"#).unwrap();
        assert_eq!(
            rule.resolve_levels().unwrap(),
            vec![LogLevel::Info, LogLevel::Warn, LogLevel::Error]
        );
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let rule: RuleConfig =
            serde_json::from_str(r#"{ "min_level": "Error", "max_level": "Info" }"#).unwrap();
        let (registry, _, _) = registry();

        assert!(matches!(
            rule.build(&registry),
            Err(RouterError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_write_to_accepts_list_or_string() {
        let list: RuleConfig = serde_json::from_str(r#"{ "write_to": ["console", "file"] }"#).unwrap();
        let csv: RuleConfig = serde_json::from_str(r#"{ "write_to": "console, file" }"#).unwrap();

        assert_eq!(list.write_to, vec!["console", "file"]);
        assert_eq!(csv.write_to, list.write_to);
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let config =
            LoggingConfig::from_json(r#"{ "rules": [ { "write_to": "missing" } ] }"#).unwrap();
        let (registry, _, _) = registry();

        match config.build_rule_set(&registry) {
            Err(RouterError::UnknownTarget { name }) => assert_eq!(name, "missing"),
            other => panic!("expected UnknownTarget, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_nested_tree() {
        let config = LoggingConfig::from_json(
            r#"{
                "rules": [
                    {
                        "name": "App.*",
                        "min_level": "Info",
                        "write_to": ["console"],
                        "final": true,
                        "rules": [ { "name": "App.Db*", "level": "Error", "write_to": "file" } ]
                    },
                    { "write_to": "file" }
                ]
            }"#,
        )
        .unwrap();
        let (registry, console, file) = registry();
        let rules = config.build_rule_set(&registry).unwrap();

        assert_eq!(rules.rules().len(), 2);
        let top = &rules.rules()[0];
        assert!(top.is_final());
        assert!(same_target(&top.targets()[0], &console));
        assert!(same_target(&top.child_rules()[0].targets()[0], &file));

        let event = LogEvent::new("App.Db", LogLevel::Error, "down");
        let selection = rules.select_targets("App.Db", LogLevel::Error, &event).unwrap();
        assert_eq!(selection.names(), vec!["console", "file"]);
        assert!(selection.stopped);
    }

    #[test]
    fn test_filters_from_config() {
        let config = LoggingConfig::from_json(
            r#"{
                "rules": [ {
                    "write_to": "console",
                    "filters": [
                        { "type": "when_contains", "text": "SECRET", "ignore_case": true },
                        { "type": "when_equal", "text": "ping", "action": "accept" },
                        { "type": "sample", "rate": 1.0 }
                    ]
                } ]
            }"#,
        )
        .unwrap();
        let (registry, _, _) = registry();
        let rules = config.build_rule_set(&registry).unwrap();

        let select = |message: &str| {
            let event = LogEvent::new("App", LogLevel::Info, message);
            rules.select_targets("App", LogLevel::Info, &event).unwrap().len()
        };
        assert_eq!(select("my secret token"), 0);
        assert_eq!(select("ping"), 1);
        assert_eq!(select("ordinary"), 1);
    }

    #[test]
    fn test_invalid_sample_rate() {
        let filter: FilterConfig = serde_json::from_str(r#"{ "type": "sample", "rate": 2.0 }"#).unwrap();
        assert!(matches!(
            filter.build(),
            Err(RouterError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_logger_rate() {
        let filter: FilterConfig = serde_json::from_str(
            r#"{ "type": "sample", "rate": 1.0, "logger_rates": { "App": 5.0 } }"#,
        )
        .unwrap();
        assert!(matches!(
            filter.build(),
            Err(RouterError::InvalidConfiguration { .. })
        ));

        let config = LoggingConfig::from_json(
            r#"{ "rules": [ { "write_to": "console",
                 "filters": [ { "type": "sample", "logger_rates": { "App": -0.5 } } ] } ] }"#,
        )
        .unwrap();
        let (registry, _, _) = registry();
        assert!(matches!(
            config.build_rule_set(&registry),
            Err(RouterError::InvalidConfiguration { .. })
        ));

        let mut sampling = SamplingConfig::default();
        sampling.logger_rates.insert("App".to_string(), f64::NAN);
        assert!(FilterConfig::Sample(sampling).build().is_err());

        let filter: FilterConfig = serde_json::from_str(
            r#"{ "type": "sample", "rate": 0.5, "logger_rates": { "App": 0.0, "Db": 1.0 } }"#,
        )
        .unwrap();
        assert!(filter.build().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"rules":[{"name":"App.*","min_level":"INFO","write_to":["console"],"final":true}]}"#;
        let config = LoggingConfig::from_json(json).unwrap();
        let reparsed = LoggingConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_registry_lookup() {
        let (mut registry, console, _) = registry();
        assert_eq!(registry.names(), vec!["console", "file"]);
        assert!(same_target(&registry.get("console").unwrap(), &console));

        let alias: TargetRef = Arc::new(MemoryTarget::new("stderr"));
        registry.register_as("errors", alias);
        assert!(registry.contains("errors"));
        assert!(!registry.contains("stderr"));
        assert_eq!(registry.len(), 3);
    }
}
