#![forbid(unsafe_code)]

mod interpreter;
mod tokenizer;

use std::collections::BTreeMap;

use pd_core::{Command, CommandKind, PathError};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

pub use interpreter::CommandCode;
pub use tokenizer::{COMMAND_LETTERS, Token, is_command_letter, split_command, tokenize_path};

use interpreter::Interpreter;

/// Counts gathered while interpreting one path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PathStats {
    pub token_count: usize,
    /// Number of moveto operations, explicit or relative.
    pub move_count: usize,
    /// Number of closepath operations, including ones that emitted nothing.
    pub close_count: usize,
    pub command_count: usize,
    pub by_kind: BTreeMap<CommandKind, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub commands: Vec<Command>,
    pub stats: PathStats,
}

/// Parse path data into absolute drawing commands.
///
/// ```
/// use pd_core::{Command, Point};
///
/// let commands = pd_parser::parse_path("M1 1 L1 2 Z").unwrap();
/// assert_eq!(
///     commands,
///     vec![
///         Command::line(Point::new(1.0, 1.0), Point::new(1.0, 2.0)),
///         Command::line(Point::new(1.0, 2.0), Point::new(1.0, 1.0)),
///     ]
/// );
/// ```
pub fn parse_path(d: &str) -> Result<Vec<Command>, PathError> {
    parse_with_stats(d).map(|outcome| outcome.commands)
}

/// Parse path data and report counts alongside the commands.
pub fn parse_with_stats(d: &str) -> Result<ParseOutcome, PathError> {
    let tokens = tokenize_path(d);
    let output = Interpreter::new(d, &tokens).run()?;

    let mut by_kind = BTreeMap::new();
    for command in &output.commands {
        *by_kind.entry(command.kind()).or_insert(0) += 1;
    }
    let stats = PathStats {
        token_count: tokens.len(),
        move_count: output.move_count,
        close_count: output.close_count,
        command_count: output.commands.len(),
        by_kind,
    };

    debug!(
        tokens = stats.token_count,
        commands = stats.command_count,
        moves = stats.move_count,
        "parsed path data"
    );

    Ok(ParseOutcome {
        commands: output.commands,
        stats,
    })
}

#[must_use]
pub fn parse_evidence_json(outcome: &ParseOutcome) -> String {
    let by_kind: BTreeMap<&str, usize> = outcome
        .stats
        .by_kind
        .iter()
        .map(|(kind, count)| (kind.as_str(), *count))
        .collect();

    json!({
        "token_count": outcome.stats.token_count,
        "command_count": outcome.stats.command_count,
        "move_count": outcome.stats.move_count,
        "close_count": outcome.stats.close_count,
        "by_kind": by_kind,
    })
    .to_string()
}
