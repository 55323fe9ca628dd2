//! Property-based tests for logger_preset
//!
//! Uses proptest to verify invariants across randomized inputs.

use logger_preset::appenders::console::split_label;
use logger_preset::crash::{CrashEvent, CrashKind, CrashReport, StackFrame};
use logger_preset::prelude::*;
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = TransportKind> {
    prop_oneof![Just(TransportKind::Console), Just(TransportKind::File)]
}

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Silly),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

proptest! {
    /// One appender per requested kind, in order, duplicates kept
    #[test]
    fn assembly_matches_requested_kinds(kinds in prop::collection::vec(kind_strategy(), 0..8)) {
        let appenders = logger_preset::assemble_transports(&kinds, &TransportContext::default()).unwrap();
        prop_assert_eq!(appenders.len(), kinds.len());

        for (appender, kind) in appenders.iter().zip(&kinds) {
            let expected = match kind {
                TransportKind::Console => "console",
                TransportKind::File => "file",
                TransportKind::Sentry => "sentry",
            };
            prop_assert_eq!(appender.name(), expected);
        }
    }

    /// Kind names parse regardless of case
    #[test]
    fn kind_names_are_case_insensitive(kind in kind_strategy(), lower in any::<bool>()) {
        let name = if lower { kind.as_str().to_lowercase() } else { kind.as_str().to_string() };
        prop_assert_eq!(name.parse::<TransportKind>().unwrap(), kind);
    }

    /// Label is the upper-cased text before the first delimiter, body the rest
    #[test]
    fn label_split_on_first_delimiter(
        label in "[a-z]{1,10}",
        body in "[a-zA-Z :]{0,30}",
        level in level_strategy(),
    ) {
        let message = format!("{}::{}", label, body);
        let (split_label_text, split_body) = split_label(&message, level);

        prop_assert_eq!(split_label_text, label.to_uppercase());
        prop_assert_eq!(split_body, body.as_str());
    }

    /// Messages without a delimiter are labelled with their level
    #[test]
    fn unlabelled_messages_use_level(message in "[a-zA-Z ]{0,40}", level in level_strategy()) {
        let (label, body) = split_label(&message, level);
        prop_assert_eq!(label, level.to_str().to_uppercase());
        prop_assert_eq!(body, message.as_str());
    }

    /// Level ordering matches the numeric order
    #[test]
    fn level_ordering(a in level_strategy(), b in level_strategy()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
    }

    /// The report points at the first frame only
    #[test]
    fn report_uses_top_frame(
        message in "[a-z ]{1,20}",
        frames in prop::collection::vec(("[a-z]{1,8}\\.rs", 1u32..5000, 1u32..200), 1..5),
    ) {
        let frames: Vec<StackFrame> = frames
            .into_iter()
            .map(|(file, line, column)| StackFrame::new(file, line, column))
            .collect();
        let expected = frames[0].to_string();
        let report = CrashReport::from_event(&CrashEvent::new(CrashKind::Unhandled, message.clone(), frames));

        prop_assert_eq!(
            report.log_line(),
            format!("UN_HANDLED_ERROR: message: {}, Error At: {}", message, expected)
        );
    }

    /// A rendered frame parses back to itself
    #[test]
    fn frame_display_parses(file in "[a-z/]{1,16}\\.rs", line in 1u32..100_000, column in 1u32..500) {
        let frame = StackFrame::new(file, line, column);
        prop_assert_eq!(frame.to_string().parse::<StackFrame>().unwrap(), frame);
    }
}
