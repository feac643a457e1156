//! Property-based tests for aelog using proptest

use aelog::appenders::{derive_error_path, normalize_log_path};
use aelog::facade::render_message;
use aelog::prelude::*;
use proptest::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back in any letter case
    #[test]
    fn test_level_name_any_case(level in any_level(), mask in any::<u16>()) {
        let name: String = level
            .to_str()
            .chars()
            .enumerate()
            .map(|(i, c)| if mask & (1 << (i % 16)) != 0 { c.to_ascii_lowercase() } else { c })
            .collect();
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Ordering follows severity
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a.cmp(&b), (a as u8).cmp(&(b as u8)));
    }

    /// Anything outside the known names and aliases is rejected
    #[test]
    fn test_unknown_level_names_rejected(name in "[a-z]{1,12}") {
        let known = ["debug", "info", "warning", "warn", "error", "critical", "fatal"];
        prop_assume!(!known.contains(&name.as_str()));
        prop_assert!(name.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Message Rendering Tests
// ============================================================================

proptest! {
    /// Rendering is a plain join of the displayed arguments
    #[test]
    fn test_render_matches_join(parts in prop::collection::vec(".{0,20}", 1..8), sep in ".{0,3}") {
        let args: Vec<&dyn Display> = parts.iter().map(|p| p as &dyn Display).collect();
        prop_assert_eq!(render_message(&args, &sep), parts.join(&sep));
    }

    /// Numbers render through Display
    #[test]
    fn test_render_numbers(a in any::<i64>(), b in any::<u32>()) {
        prop_assert_eq!(render_message(&[&a, &b], " "), format!("{} {}", a, b));
    }

    /// A record never carries raw line breaks in its message
    #[test]
    fn test_message_never_spans_lines(message in ".*", level in any_level()) {
        let entry = LogEntry::new(level, "prop", &message);
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
    }
}

// ============================================================================
// Path Derivation Tests
// ============================================================================

proptest! {
    /// `<stem>.<ext>` pairs with `<stem>_error.<ext>` in the same directory
    #[test]
    fn test_error_path_derivation(stem in "[a-z][a-z0-9_]{0,10}", ext in "[a-z]{1,4}") {
        let access = PathBuf::from("logs").join(format!("{}.{}", stem, ext));
        let error = derive_error_path(&access);
        prop_assert_eq!(error, Path::new("logs").join(format!("{}_error.{}", stem, ext)));
    }

    /// A path without extension gains `.log`; one with an extension is kept
    #[test]
    fn test_normalize_log_path(stem in "[a-z][a-z0-9_]{0,10}", ext in "[a-z]{1,4}") {
        prop_assert_eq!(
            normalize_log_path(Path::new(&stem)),
            PathBuf::from(format!("{}.log", stem))
        );
        let with_ext = PathBuf::from(format!("{}.{}", stem, ext));
        prop_assert_eq!(normalize_log_path(&with_ext), with_ext);
    }

    /// Derived error paths never collide with their access path
    #[test]
    fn test_error_path_differs(stem in "[a-z][a-z0-9_]{0,10}") {
        let access = normalize_log_path(Path::new(&stem));
        prop_assert_ne!(derive_error_path(&access), access);
    }
}

// ============================================================================
// Routing Tests
// ============================================================================

proptest! {
    /// A route admits its own name and `::` children, never siblings sharing
    /// a textual prefix
    #[test]
    fn test_route_prefix_boundaries(base in "[a-z]{1,8}", child in "[a-z]{1,8}", suffix in "[a-z]{1,4}") {
        let logger = Logger::builder()
            .sink("all", LogLevel::Debug, ConsoleAppender::stderr())
            .route(base.clone(), LogLevel::Debug, ["all"])
            .build()
            .unwrap();

        let nested = format!("{}::{}", base, child);
        let sibling = format!("{}{}", base, suffix);
        prop_assert!(logger.enabled(LogLevel::Info, &base));
        prop_assert!(logger.enabled(LogLevel::Info, &nested));
        prop_assert!(!logger.enabled(LogLevel::Info, &sibling));
    }
}
