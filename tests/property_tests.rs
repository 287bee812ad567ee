//! Property-based tests for rust_log_router using proptest

use proptest::prelude::*;
use rust_log_router::prelude::*;
use rust_log_router::NameMatcher;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that level ordering follows ordinals
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let ord1 = level1.ordinal();
        let ord2 = level2.ordinal();

        prop_assert_eq!(level1 <= level2, ord1 <= ord2);
        prop_assert_eq!(level1 < level2, ord1 < ord2);
        prop_assert_eq!(level1 > level2, ord1 > ord2);
    }

    /// Test that ordinals beyond the last level are rejected
    #[test]
    fn test_log_level_from_ordinal(ordinal in 0usize..64) {
        let result = LogLevel::from_ordinal(ordinal);
        if ordinal <= LogLevel::MAX_ORDINAL {
            prop_assert_eq!(result.unwrap().ordinal(), ordinal);
        } else {
            let is_ordinal_error = matches!(result, Err(RouterError::InvalidLevelOrdinal { .. }));
            prop_assert!(is_ordinal_error);
        }
    }

    /// Test that parsing is case-insensitive
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(input.parse::<LogLevel>().unwrap(), level);
    }

    /// Test that FromStr handles invalid input gracefully
    #[test]
    fn test_log_level_invalid_parse(invalid_str in "[^TDIWEFtdiwefor]+") {
        let result: std::result::Result<LogLevel, RouterError> = invalid_str.parse();
        prop_assert!(result.is_err(), "Expected parse error for '{}'", invalid_str);
    }
}

// ============================================================================
// LevelSet Tests
// ============================================================================

proptest! {
    /// A range enables exactly the levels between its bounds
    #[test]
    fn test_level_set_range(min in any_level(), max in any_level(), probe in any_level()) {
        let set = LevelSet::range(min, max);
        prop_assert_eq!(set.is_enabled(probe), min <= probe && probe <= max);
        if min > max {
            prop_assert!(set.is_empty());
        }
    }

    /// from_min enables the minimum and everything above it
    #[test]
    fn test_level_set_from_min(min in any_level()) {
        let set = LevelSet::from_min(min);
        prop_assert_eq!(set.len(), LogLevel::COUNT - min.ordinal());
        prop_assert_eq!(set.levels().first().copied(), Some(min));
    }

    /// set_levels replaces the previous contents
    #[test]
    fn test_level_set_replace(
        before in prop::collection::vec(any_level(), 0..6),
        after in prop::collection::vec(any_level(), 0..6),
    ) {
        let mut set: LevelSet = before.into_iter().collect();
        set.set_levels(after.iter().copied());

        for level in LogLevel::ALL {
            prop_assert_eq!(set.is_enabled(level), after.contains(&level));
        }
    }
}

// ============================================================================
// Name Pattern Tests
// ============================================================================

proptest! {
    /// A pattern without wildcards only matches itself
    #[test]
    fn test_plain_pattern_is_exact(pattern in "[A-Za-z.]{1,12}", name in "[A-Za-z.]{0,12}") {
        let matcher = NameMatcher::new(pattern.clone());
        prop_assert_eq!(matcher.mode(), MatchMode::Equals);
        prop_assert!(matcher.matches(&pattern));
        prop_assert_eq!(matcher.matches(&name), name == pattern);
    }

    /// A trailing wildcard matches every name with that prefix
    #[test]
    fn test_prefix_pattern(prefix in "[A-Za-z.]{1,8}", suffix in "[A-Za-z.]{0,8}") {
        let matcher = NameMatcher::new(format!("{}*", prefix));
        prop_assert_eq!(matcher.mode(), MatchMode::StartsWith);
        let name = format!("{}{}", prefix, suffix);
        prop_assert!(matcher.matches(&name));
    }

    /// A leading wildcard matches every name with that suffix
    #[test]
    fn test_suffix_pattern(prefix in "[A-Za-z.]{0,8}", suffix in "[A-Za-z.]{1,8}") {
        let matcher = NameMatcher::new(format!("*{}", suffix));
        prop_assert_eq!(matcher.mode(), MatchMode::EndsWith);
        let name = format!("{}{}", prefix, suffix);
        prop_assert!(matcher.matches(&name));
    }

    /// Wildcards at both ends match any name containing the middle
    #[test]
    fn test_contains_pattern(
        head in "[A-Za-z]{0,6}",
        middle in "[A-Za-z.]{1,6}",
        tail in "[A-Za-z]{0,6}",
    ) {
        let matcher = NameMatcher::new(format!("*{}*", middle));
        prop_assert_eq!(matcher.mode(), MatchMode::Contains);
        let name = format!("{}{}{}", head, middle, tail);
        prop_assert!(matcher.matches(&name));
    }

    /// The lone wildcard matches everything
    #[test]
    fn test_wildcard_matches_all(name in ".*") {
        prop_assert!(NameMatcher::new("*").matches(&name));
    }

    /// More than two wildcards never match
    #[test]
    fn test_extra_wildcards_match_nothing(
        a in "[A-Za-z]{1,4}",
        b in "[A-Za-z]{1,4}",
        name in ".*",
    ) {
        let matcher = NameMatcher::new(format!("*{}*{}*", a, b));
        prop_assert_eq!(matcher.mode(), MatchMode::None);
        prop_assert!(!matcher.matches(&name));
    }
}

// ============================================================================
// Rule Selection Tests
// ============================================================================

proptest! {
    /// A min-level rule selects its target exactly for levels at or above the minimum
    #[test]
    fn test_min_level_rule_selection(min in any_level(), level in any_level(), name in "[A-Za-z.]{1,12}") {
        let target: TargetRef = Arc::new(MemoryTarget::new("memory"));
        let rules = RuleSet::new(vec![LoggingRule::with_min_level("*", min, target)]);
        let event = LogEvent::new(name.clone(), level, "x");

        let selection = rules.select_targets(&name, level, &event).unwrap();
        prop_assert_eq!(selection.len(), usize::from(level >= min));
        prop_assert_eq!(rules.is_enabled(&name, level), level >= min);
    }

    /// A target reached through many rules is selected once
    #[test]
    fn test_selection_is_distinct(copies in 1usize..8, level in any_level()) {
        let target: TargetRef = Arc::new(MemoryTarget::new("memory"));
        let rules: Vec<LoggingRule> = (0..copies)
            .map(|_| LoggingRule::with_min_level("*", LogLevel::Trace, Arc::clone(&target)))
            .collect();
        let rules = RuleSet::new(rules);
        let event = LogEvent::new("App", level, "x");

        prop_assert_eq!(rules.select_targets("App", level, &event).unwrap().len(), 1);
    }
}

// ============================================================================
// Message Sanitization Tests
// ============================================================================

proptest! {
    /// Messages never carry raw line breaks or tabs
    #[test]
    fn test_message_sanitization(message in ".*") {
        let event = LogEvent::new("App", LogLevel::Info, message.clone());

        prop_assert!(!event.message.contains('\n'));
        prop_assert!(!event.message.contains('\r'));
        prop_assert!(!event.message.contains('\t'));
        if message.contains('\n') {
            prop_assert!(event.message.contains("\\n"));
        }
    }
}

// ============================================================================
// Sequence Registry Tests
// ============================================================================

proptest! {
    /// A sequence hands out start, start + step, start + 2 * step, ...
    #[test]
    fn test_sequence_progression(start in -1000i64..1000, step in -10i64..10, calls in 1usize..50) {
        let registry = SequenceRegistry::new();

        for i in 0..calls {
            let value = registry.get_and_advance("seq", start, step);
            prop_assert_eq!(value, start + step * i as i64);
        }
        prop_assert_eq!(registry.current("seq"), Some(start + step * calls as i64));
    }

    /// Only the first call on a name uses its default
    #[test]
    fn test_sequence_default_applies_once(first in -100i64..100, second in -100i64..100) {
        let registry = SequenceRegistry::new();

        prop_assert_eq!(registry.get_and_advance("seq", first, 1), first);
        prop_assert_eq!(registry.get_and_advance("seq", second, 1), first + 1);
    }

    /// Counters wrap instead of overflowing
    #[test]
    fn test_sequence_wraps(step in 1i64..1000) {
        let registry = SequenceRegistry::new();

        prop_assert_eq!(registry.get_and_advance("seq", i64::MAX, step), i64::MAX);
        prop_assert_eq!(registry.current("seq"), Some(i64::MAX.wrapping_add(step)));
    }
}
