//! Sampling filter for high-volume loggers
//!
//! Rejects a random share of events so a rule's targets only see a
//! sample. Configured levels (Error and Fatal by default) always pass.
//!
//! # Example
//!
//! ```
//! use rust_log_router::prelude::*;
//! use rust_log_router::filters::{SamplingConfig, SamplingFilter};
//! use std::sync::Arc;
//!
//! let sampler = SamplingFilter::new(SamplingConfig::new(0.1).with_logger_rate("App.Chatty", 0.01));
//! let rule = LoggingRule::new("App.*")
//!     .min_level(LogLevel::Debug)
//!     .filter(Arc::new(sampler));
//! ```

use crate::core::{Filter, FilterResult, LogEvent, LogLevel, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

fn default_rate() -> f64 {
    1.0
}

fn default_always_sample() -> Vec<LogLevel> {
    vec![LogLevel::Error, LogLevel::Fatal]
}

/// Configuration for event sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sample rate between 0.0 and 1.0
    ///
    /// - 1.0 = keep everything
    /// - 0.1 = keep 10% of events
    /// - 0.0 = drop everything except `always_sample` levels
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Levels that are never sampled away
    #[serde(default = "default_always_sample")]
    pub always_sample: Vec<LogLevel>,

    /// Per-logger rates, keyed by exact logger name
    #[serde(default)]
    pub logger_rates: HashMap<String, f64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            always_sample: default_always_sample(),
            logger_rates: HashMap::new(),
        }
    }
}

impl SamplingConfig {
    /// Create a config with `rate`, clamped to `0.0..=1.0`
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_always_sample(mut self, levels: Vec<LogLevel>) -> Self {
        self.always_sample = levels;
        self
    }

    /// Override the rate for one logger name
    #[must_use]
    pub fn with_logger_rate(mut self, logger_name: impl Into<String>, rate: f64) -> Self {
        self.logger_rates.insert(logger_name.into(), rate.clamp(0.0, 1.0));
        self
    }
}

/// Counters of kept and dropped events
#[derive(Debug, Default)]
pub struct SamplerMetrics {
    sampled_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    /// Observed share of kept events; 1.0 before anything was seen
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            1.0
        } else {
            self.sampled_count() as f64 / total as f64
        }
    }

    fn record(&self, sampled: bool) -> bool {
        if sampled {
            self.sampled_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dropped_count.fetch_add(1, Ordering::Relaxed);
        }
        sampled
    }
}

/// Filter that rejects events at random according to a [`SamplingConfig`].
///
/// A kept event yields [`FilterResult::Neutral`] so later filters still
/// get their say; a dropped one yields [`FilterResult::Reject`].
pub struct SamplingFilter {
    config: SamplingConfig,
    metrics: SamplerMetrics,
}

impl SamplingFilter {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            metrics: SamplerMetrics::new(),
        }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    /// Decide whether an event from `logger_name` at `level` is kept
    pub fn should_sample(&self, logger_name: &str, level: LogLevel) -> bool {
        if self.config.always_sample.contains(&level) {
            return self.metrics.record(true);
        }

        let rate = self
            .config
            .logger_rates
            .get(logger_name)
            .copied()
            .unwrap_or(self.config.rate);

        if rate >= 1.0 {
            return self.metrics.record(true);
        }
        if rate <= 0.0 {
            return self.metrics.record(false);
        }

        self.metrics.record(rand::thread_rng().gen::<f64>() < rate)
    }
}

impl Filter for SamplingFilter {
    fn evaluate(&self, event: &LogEvent) -> Result<FilterResult> {
        if self.should_sample(&event.logger_name, event.level) {
            Ok(FilterResult::Neutral)
        } else {
            Ok(FilterResult::Reject)
        }
    }

    fn name(&self) -> &str {
        "sample"
    }
}

impl fmt::Debug for SamplingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingFilter")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish()
    }
}
