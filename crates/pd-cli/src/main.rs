#![forbid(unsafe_code)]

//! Path data CLI - parse and validate SVG path `d` strings.
//!
//! # Commands
//!
//! - `parse`: Output the absolute drawing commands as JSON or YAML
//! - `tokenize`: Show the token stream the interpreter consumes
//! - `validate`: Check path data and report the first error with its location

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pd_core::PathError;
use pd_parser::{ParseOutcome, parse_evidence_json, parse_with_stats, tokenize_path};
use serde::Serialize;
use tracing::{debug, error, info};

/// Path data CLI - parse and validate SVG path data.
#[derive(Debug, Parser)]
#[command(
    name = "pd-cli",
    version,
    about = "Parse and validate SVG path data",
    long_about = "Turns SVG path data (the `d` attribute mini-language) into absolute\n\
        lines, quadratic and cubic Bezier curves, and elliptical arcs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse path data and print the resulting commands.
    Parse {
        /// Input file path, "-" for stdin, or inline path data.
        #[arg(default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Print counts instead of the full command list
        #[arg(long)]
        summary: bool,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the token stream for path data.
    Tokenize {
        /// Input file path, "-" for stdin, or inline path data.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON with byte offsets
        #[arg(long)]
        json: bool,
    },

    /// Validate path data and report the first error.
    Validate {
        /// Input file path, "-" for stdin, or inline path data.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON (structured diagnostic)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Result of validating path data.
#[derive(Debug, Serialize)]
struct ValidateResult {
    valid: bool,
    command_count: usize,
    error: Option<ValidationError>,
}

#[derive(Debug, Serialize)]
struct ValidationError {
    code: String,
    message: String,
    line: Option<usize>,
    column: Option<usize>,
    /// Set when the failure is a parser defect rather than bad input.
    parser_bug: bool,
}

impl From<&PathError> for ValidationError {
    fn from(err: &PathError) -> Self {
        let span = err.span();
        Self {
            code: err.code().as_str().to_string(),
            message: err.to_string(),
            line: span.map(|span| span.start.line),
            column: span.map(|span| span.start.col),
            parser_bug: err.is_internal(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Parse {
            input,
            format,
            pretty,
            summary,
            output,
        } => cmd_parse(&input, format, pretty, summary, output.as_deref()),

        Command::Tokenize { input, json } => cmd_tokenize(&input, json),

        Command::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline path data
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Log a parse failure the way its kind deserves and turn it into an error.
fn report_parse_error(err: PathError) -> anyhow::Error {
    if err.is_internal() {
        error!("Parser bug ({}): {err}", err.code().as_str());
    } else {
        debug!("Invalid path data ({}): {err}", err.code().as_str());
    }
    let location = err
        .span()
        .map(|span| format!(" at line {}, column {}", span.start.line, span.start.col))
        .unwrap_or_default();
    anyhow::Error::new(err).context(format!("Failed to parse path data{location}"))
}

// =============================================================================
// Command: parse
// =============================================================================

fn cmd_parse(
    input: &str,
    format: OutputFormat,
    pretty: bool,
    summary: bool,
    output: Option<&str>,
) -> Result<()> {
    let source = load_input(input)?;

    let parse_start = Instant::now();
    let outcome = parse_with_stats(&source).map_err(report_parse_error)?;
    let parse_time = parse_start.elapsed();

    debug!(
        "Parsed: tokens={}, commands={}, moves={} in {:.3}ms",
        outcome.stats.token_count,
        outcome.stats.command_count,
        outcome.stats.move_count,
        parse_time.as_secs_f64() * 1000.0
    );

    let rendered = render_outcome(&outcome, format, pretty, summary)?;
    write_output(output, &rendered)
}

fn render_outcome(
    outcome: &ParseOutcome,
    format: OutputFormat,
    pretty: bool,
    summary: bool,
) -> Result<String> {
    let rendered = match (format, summary) {
        (OutputFormat::Json, false) if pretty => serde_json::to_string_pretty(&outcome.commands)?,
        (OutputFormat::Json, false) => serde_json::to_string(&outcome.commands)?,
        (OutputFormat::Json, true) if pretty => {
            let value: serde_json::Value = serde_json::from_str(&parse_evidence_json(outcome))?;
            serde_json::to_string_pretty(&value)?
        }
        (OutputFormat::Json, true) => parse_evidence_json(outcome),
        (OutputFormat::Yaml, false) => serde_yaml::to_string(&outcome.commands)
            .context("Failed to encode commands as YAML")?,
        (OutputFormat::Yaml, true) => {
            let value: serde_json::Value = serde_json::from_str(&parse_evidence_json(outcome))?;
            serde_yaml::to_string(&value).context("Failed to encode summary as YAML")?
        }
    };
    Ok(rendered)
}

// =============================================================================
// Command: tokenize
// =============================================================================

fn cmd_tokenize(input: &str, json_output: bool) -> Result<()> {
    let source = load_input(input)?;
    let tokens = tokenize_path(&source);

    if json_output {
        let output = serde_json::to_string_pretty(&tokens)?;
        println!("{output}");
    } else {
        for token in &tokens {
            println!("{:>6}  {}", token.offset, token.text);
        }
    }

    info!("Tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(())
}

// =============================================================================
// Command: validate
// =============================================================================

fn cmd_validate(input: &str, json_output: bool) -> Result<()> {
    let source = load_input(input)?;
    let parsed = parse_with_stats(&source);

    let result = match &parsed {
        Ok(outcome) => ValidateResult {
            valid: true,
            command_count: outcome.stats.command_count,
            error: None,
        },
        Err(err) => {
            if err.is_internal() {
                error!("Parser bug while validating: {err}");
            }
            ValidateResult {
                valid: false,
                command_count: 0,
                error: Some(ValidationError::from(err)),
            }
        }
    };

    if json_output {
        let output = serde_json::to_string_pretty(&result)?;
        println!("{output}");
    } else {
        if result.valid {
            println!("✓ Valid path data");
        } else {
            println!("✗ Invalid path data");
        }

        println!("  Commands: {}", result.command_count);

        if let Some(err) = &result.error {
            let location = match (err.line, err.column) {
                (Some(l), Some(c)) => format!(" (line {l}, col {c})"),
                (Some(l), None) => format!(" (line {l})"),
                _ => String::new(),
            };
            println!("\nError:");
            println!("  [{}] {}{}", err.code, err.message, location);
            if err.parser_bug {
                println!("       → this is a parser bug, not a problem with the input");
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}
