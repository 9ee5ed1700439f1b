//! Integration tests for the path data pipeline.
//!
//! These tests drive the full flow from raw text through tokenizing to the
//! interpreted command sequence.

use pd_core::{Command, CommandKind, PathError, PathErrorCode, Point};
use pd_parser::{parse_path, parse_with_stats, tokenize_path};

/// Test that a multi-subpath icon parses with connected subpaths.
#[test]
fn icon_parses_into_connected_subpaths() {
    let input = r#"
        M10 10 h80 v80 h-80 Z
        M30 30 c10 -10 30 -10 40 0 s10 30 0 40
        Q40 90 30 70 t0 -40 z
    "#;

    let outcome = parse_with_stats(input).expect("icon should parse");
    assert_eq!(outcome.stats.move_count, 2, "Expected 2 subpaths");
    assert_eq!(outcome.stats.close_count, 2);

    // First subpath is a closed square: 3 explicit sides and the closing line.
    let square = &outcome.commands[..4];
    assert!(square.iter().all(|command| command.kind() == CommandKind::Line));
    assert_eq!(square[3].end(), Point::new(10.0, 10.0));

    // Every subpath is a chain of end-to-start segments.
    for subpath in [&outcome.commands[..4], &outcome.commands[4..]] {
        for pair in subpath.windows(2) {
            assert_eq!(
                pair[0].end(),
                pair[1].start(),
                "Segment {:?} does not continue from {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    let last = outcome.commands.last().expect("commands");
    assert_eq!(
        last.end(),
        Point::new(30.0, 30.0),
        "path should end back at the second subpath start"
    );
}

/// Test determinism: same input produces identical commands.
#[test]
fn parsing_is_deterministic() {
    let input = "M100,200 C100,100 250,100 250,200 S400,300 400,200 a25,25 -30 0,1 50,-25";
    let first = parse_path(input).expect("parse");
    let second = parse_path(input).expect("parse");
    assert_eq!(first, second);
}

/// Test that parses run independently on many threads.
#[test]
fn parsing_runs_concurrently() {
    let inputs = [
        "M0 0 L10 10 Z",
        "M200,300 Q400,50 600,300 T1000,300",
        "M300,200 h-150 a150,150 0 1,0 150,-150 z",
        "M 1 foo",
    ];

    let expected: Vec<_> = inputs.iter().map(|input| parse_path(input)).collect();

    let handles: Vec<_> = inputs
        .iter()
        .map(|input| {
            let input = (*input).to_string();
            std::thread::spawn(move || parse_path(&input))
        })
        .collect();

    for (handle, expected) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().expect("thread"), expected);
    }
}

/// Test that the three error kinds stay distinct.
#[test]
fn error_kinds_are_distinct() {
    let malformed = parse_path("Z 1 1").expect_err("malformed");
    assert_eq!(malformed.code(), PathErrorCode::MalformedPath);

    let number = parse_path("M 1 foo").expect_err("number format");
    assert_eq!(number.code(), PathErrorCode::NumberFormat);
    assert!(!number.is_internal());

    let letter_operand = parse_path("M 1 L 2 2").expect_err("letter as operand");
    assert_eq!(letter_operand.code(), PathErrorCode::NumberFormat);

    let truncated = parse_path("M0 0 A5 5 0 1 1").expect_err("truncated arc");
    assert_eq!(truncated.code(), PathErrorCode::MalformedPath);
}

/// Test that errors point at the offending line and column.
#[test]
fn errors_report_multiline_positions() {
    let input = "M0 0\nL1 1\n  L2 x";
    let err = parse_path(input).expect_err("must fail");
    let PathError::NumberFormat { token, span } = err else {
        panic!("expected number format error, got {err:?}");
    };
    assert_eq!(token, "x");
    assert_eq!(span.start.line, 3);
    assert_eq!(span.start.col, 6);
}

/// Test that the token stream and command stream agree in size.
#[test]
fn tokens_feed_commands() {
    let input = "M1e1,2E0 L-.5.5";
    let tokens: Vec<&str> = tokenize_path(input).iter().map(|t| t.text).collect();
    assert_eq!(tokens, ["M", "1e1", "2E0", "L", "-.5", ".5"]);

    let commands = parse_path(input).expect("parse");
    assert_eq!(
        commands,
        vec![Command::line(Point::new(10.0, 2.0), Point::new(-0.5, 0.5))]
    );
}

/// Test that commands serialize for downstream consumers.
#[test]
fn commands_serialize_to_json() {
    let commands = parse_path("M0 0 Q1 1 2 0").expect("parse");
    let encoded = serde_json::to_string(&commands).expect("serialize");
    let decoded: Vec<Command> = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, commands);
}
