//! Property-based tests for rust_batch_logger using proptest

use proptest::prelude::*;
use rust_batch_logger::core::{format_line, LogRecord};
use rust_batch_logger::prelude::*;
use rust_batch_logger::sinks::rotation::backup_path;
use rust_batch_logger::{format_template, HandoffQueue};
use std::path::Path;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
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

    /// Parsing ignores case
    #[test]
    fn test_log_level_parse_case_insensitive(level in any_level()) {
        let parsed: LogLevel = level.to_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }
}

// ============================================================================
// Queue Tests
// ============================================================================

proptest! {
    /// Items come out in exactly the order they went in
    #[test]
    fn test_queue_is_fifo(items in prop::collection::vec(any::<u32>(), 0..200)) {
        let queue = HandoffQueue::new();
        for item in &items {
            prop_assert!(queue.enqueue(*item).is_ok());
        }
        prop_assert_eq!(queue.count(), items.len());

        let mut drained = Vec::with_capacity(items.len());
        while let Some(item) = queue.try_dequeue() {
            drained.push(item);
        }
        prop_assert_eq!(drained, items);
        prop_assert!(queue.is_empty());
    }

    /// A closed queue keeps what it had and accepts nothing new
    #[test]
    fn test_closed_queue_rejects(
        before in prop::collection::vec(any::<u8>(), 0..50),
        after in prop::collection::vec(any::<u8>(), 1..50),
    ) {
        let queue = HandoffQueue::new();
        for item in &before {
            queue.enqueue(*item).unwrap();
        }
        queue.close();
        for item in &after {
            prop_assert_eq!(queue.enqueue(*item), Err(*item));
        }
        prop_assert_eq!(queue.drain(), before);
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// Every formatted line is a single line with the fixed prefix shape
    #[test]
    fn test_format_line_shape(level in any_level(), message in ".*") {
        let record = LogRecord::new(level, message);
        let line = format_line(&record);

        prop_assert!(!line.contains('\n'));
        prop_assert!(!line.contains('\r'));
        prop_assert!(line.starts_with('['));
        prop_assert_eq!(&line[24..27], "] [");
        let level_tag = format!("[{:<5}]", level.to_str());
        prop_assert!(line.contains(&level_tag));
        prop_assert!(line.contains("[TID:"));
    }

    /// Runtime templates never panic, whatever the input
    #[test]
    fn test_format_template_never_panics(
        template in ".*",
        args in prop::collection::vec(any::<i64>(), 0..4),
    ) {
        let refs: Vec<&dyn std::fmt::Display> =
            args.iter().map(|a| a as &dyn std::fmt::Display).collect();
        let message = format_template(&template, &refs);
        if message.is_degraded() {
            prop_assert!(message.as_str().starts_with(template.as_str()));
            prop_assert!(message.as_str().contains("[FORMAT ERROR:"));
        }
    }

    /// Templates without braces pass through unchanged
    #[test]
    fn test_plain_template_unchanged(template in "[^{}]*") {
        let message = format_template(&template, &[]);
        prop_assert!(!message.is_degraded());
        prop_assert_eq!(message.as_str(), template.as_str());
    }

    /// Sequential placeholders consume arguments in order
    #[test]
    fn test_sequential_placeholders(args in prop::collection::vec(any::<u16>(), 1..6)) {
        let template = vec!["{}"; args.len()].join(",");
        let refs: Vec<&dyn std::fmt::Display> =
            args.iter().map(|a| a as &dyn std::fmt::Display).collect();
        let expected = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",");

        prop_assert_eq!(format_template(&template, &refs).into_message(), expected);
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

proptest! {
    /// Backup names keep the directory and extension and carry the index
    #[test]
    fn test_backup_path_shape(stem in "[a-z]{1,12}", index in 1u32..10_000) {
        let path = Path::new("/var/log").join(format!("{}.log", stem));
        let backup = backup_path(&path, index);

        prop_assert_eq!(backup.parent(), path.parent());
        prop_assert_eq!(
            backup.file_name().unwrap().to_str().unwrap(),
            format!("{}_{}.log", stem, index)
        );
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

proptest! {
    /// Any positive batch and file size is a valid configuration
    #[test]
    fn test_config_validation(batch_size in 1usize..10_000, max_size in 1u64..u64::MAX) {
        let config = LoggerConfig {
            batch_size,
            max_file_size_bytes: max_size,
            ..LoggerConfig::default()
        };
        prop_assert!(config.validate().is_ok());
    }

    /// Configuration survives JSON serialization
    #[test]
    fn test_config_json_roundtrip(
        batch_size in 1usize..10_000,
        auto_rotate in any::<bool>(),
        color_enabled in any::<bool>(),
    ) {
        let config = LoggerConfig {
            batch_size,
            auto_rotate,
            color_enabled,
            output_mode: OutputMode::FileOnly,
            ..LoggerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed = LoggerConfig::from_json_str(&json).unwrap();
        prop_assert_eq!(parsed.batch_size, batch_size);
        prop_assert_eq!(parsed.auto_rotate, auto_rotate);
        prop_assert_eq!(parsed.color_enabled, color_enabled);
        prop_assert_eq!(parsed.output_mode, OutputMode::FileOnly);
    }
}
