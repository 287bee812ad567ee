//! Stress tests for concurrent routing
//!
//! These tests verify:
//! - Critical events are never dropped by a saturated async target
//! - Blocking async targets deliver every event under concurrent load
//! - Reconfiguration under load routes every event to exactly one tree
//! - Shared counters hand out unique values across threads

use rust_log_router::prelude::*;
use rust_log_router::renderers::CounterRenderer;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

struct BrokenTarget;

impl Target for BrokenTarget {
    fn write(&self, _event: &LogEvent) -> Result<()> {
        Err(RouterError::target("broken", "always fails"))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Critical events (Error, Fatal) bypass a full queue
#[test]
fn test_critical_events_never_dropped() {
    let memory = Arc::new(MemoryTarget::new("memory"));
    let wrapper = Arc::new(
        AsyncTargetWrapper::builder(memory.clone())
            .capacity(5)
            .overflow_policy(OverflowPolicy::DropNewest)
            .build(),
    );
    let factory = Arc::new(LogFactory::new(RuleSet::new(vec![LoggingRule::with_min_level(
        "*",
        LogLevel::Trace,
        wrapper.clone(),
    )])));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let logger = factory.logger(format!("Worker{}", t));
                for i in 0..100 {
                    logger.debug(format!("Debug message {}", i));
                }
                for i in 0..10 {
                    logger.error(format!("Critical error {}-{}", t, i));
                }
                for i in 0..100 {
                    logger.trace(format!("Trace message {}", i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    factory.flush().unwrap();

    let messages = memory.messages();
    for t in 0..4 {
        for i in 0..10 {
            let expected = format!("Critical error {}-{}", t, i);
            assert!(messages.contains(&expected), "{} was dropped!", expected);
        }
    }

    let metrics = wrapper.metrics();
    assert_eq!(
        metrics.enqueued() + metrics.dropped_count() + metrics.critical_preserved(),
        4 * 210,
        "every event is either queued, dropped or written through"
    );
    assert_eq!(
        messages.len() as u64,
        metrics.enqueued() + metrics.critical_preserved()
    );
}

/// Block never loses events and keeps each producer's order
#[test]
fn test_blocking_target_delivers_everything() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 1000;

    let memory = Arc::new(MemoryTarget::new("memory"));
    let wrapper: TargetRef = Arc::new(
        AsyncTargetWrapper::builder(memory.clone())
            .capacity(64)
            .overflow_policy(OverflowPolicy::Block)
            .build(),
    );
    let factory = Arc::new(LogFactory::new(RuleSet::new(vec![LoggingRule::with_min_level(
        "*",
        LogLevel::Info,
        wrapper,
    )])));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let logger = factory.logger(format!("Producer{}", t));
                for i in 0..PER_THREAD {
                    logger.info(i.to_string());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    factory.flush().unwrap();

    let events = memory.events();
    assert_eq!(events.len(), THREADS * PER_THREAD);

    for t in 0..THREADS {
        let name = format!("Producer{}", t);
        let sequence: Vec<usize> = events
            .iter()
            .filter(|e| e.logger_name == name)
            .map(|e| e.message.parse().unwrap())
            .collect();
        assert_eq!(sequence, (0..PER_THREAD).collect::<Vec<_>>());
    }
}

/// Every event lands in exactly one of the swapped trees
#[test]
fn test_reconfigure_under_load() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 2000;

    let first = Arc::new(MemoryTarget::new("first"));
    let second = Arc::new(MemoryTarget::new("second"));
    let rules_for = |target: &Arc<MemoryTarget>| {
        RuleSet::new(vec![LoggingRule::with_min_level(
            "*",
            LogLevel::Info,
            target.clone(),
        )])
    };

    let factory = Arc::new(LogFactory::new(rules_for(&first)));
    let running = Arc::new(AtomicBool::new(true));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let logger = factory.logger(format!("Thread{}", t));
                for i in 0..PER_THREAD {
                    logger.info(format!("event {}", i));
                }
            })
        })
        .collect();

    let swapper = {
        let factory = Arc::clone(&factory);
        let running = Arc::clone(&running);
        let first = first.clone();
        let second = second.clone();
        thread::spawn(move || {
            let mut use_second = true;
            while running.load(Ordering::Relaxed) {
                let target = if use_second { &second } else { &first };
                factory.reconfigure(rules_for(target));
                use_second = !use_second;
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    running.store(false, Ordering::Relaxed);
    swapper.join().unwrap();

    assert_eq!(first.len() + second.len(), THREADS * PER_THREAD);
    assert_eq!(factory.metrics().events_routed(), (THREADS * PER_THREAD) as u64);
    assert_eq!(factory.metrics().events_unrouted(), 0);
}

/// A failing target never starves a healthy one under contention
#[test]
fn test_failure_isolation_under_load() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 500;

    let healthy = Arc::new(MemoryTarget::new("healthy"));
    let factory = Arc::new(
        LogFactory::builder()
            .rule(
                LoggingRule::new("*")
                    .min_level(LogLevel::Trace)
                    .target(Arc::new(BrokenTarget))
                    .target(healthy.clone()),
            )
            .failure_policy(FailurePolicy::Skip)
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let logger = factory.logger(format!("Thread{}", t));
                for i in 0..PER_THREAD {
                    logger.warn(format!("event {}", i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = (THREADS * PER_THREAD) as u64;
    assert_eq!(healthy.len() as u64, total);
    assert_eq!(factory.metrics().target_failures(), total);
    assert_eq!(factory.metrics().target_writes(), total);
}

/// Counter renderers sharing a sequence never repeat a value
#[test]
fn test_shared_counter_uniqueness() {
    const THREADS: i64 = 8;
    const PER_THREAD: i64 = 1000;

    let registry = Arc::new(SequenceRegistry::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let renderer = CounterRenderer::new().sequence("shared").registry(registry);
                let event = LogEvent::new("App", LogLevel::Info, "x");
                (0..PER_THREAD)
                    .map(|_| renderer.render(&event).parse::<i64>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for value in handle.join().unwrap() {
            assert!(seen.insert(value), "value {} handed out twice", value);
        }
    }

    assert_eq!(seen.len() as i64, THREADS * PER_THREAD);
    assert_eq!(seen.iter().min(), Some(&1));
    assert_eq!(seen.iter().max(), Some(&(THREADS * PER_THREAD)));
    assert_eq!(registry.current("shared"), Some(THREADS * PER_THREAD + 1));
}

/// Independent sequences advance independently under contention
#[test]
fn test_sequence_registry_many_names() {
    const THREADS: usize = 8;
    const NAMES: usize = 4;
    const PER_NAME: usize = 250;

    let registry = Arc::new(SequenceRegistry::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..NAMES * PER_NAME {
                    registry.get_and_advance(&format!("seq-{}", i % NAMES), 0, 2);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), NAMES);
    for n in 0..NAMES {
        let calls = (THREADS * PER_NAME) as i64;
        assert_eq!(registry.current(&format!("seq-{}", n)), Some(calls * 2));
    }
}
