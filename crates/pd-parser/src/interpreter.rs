//! The path data state machine.
//!
//! Walks the token stream once, left to right. Each operation reads the fixed
//! number of operands its command needs (see [`CommandCode::arity`]) from an
//! index cursor over the tokens, resolves them against the current point and
//! emits at most one [`Command`].

use pd_core::{Command, PathError, Point, Span};
use serde::Serialize;
use tracing::error;

use crate::tokenizer::{Token, parse_number};

/// Path data command, independent of absolute/relative case.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum CommandCode {
    MoveTo,
    ClosePath,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicTo,
    SmoothCubicTo,
    QuadraticTo,
    SmoothQuadraticTo,
    ArcTo,
}

impl CommandCode {
    /// Look up a command letter, ignoring case.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        let code = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo,
            'Z' => Self::ClosePath,
            'L' => Self::LineTo,
            'H' => Self::HorizontalLineTo,
            'V' => Self::VerticalLineTo,
            'C' => Self::CubicTo,
            'S' => Self::SmoothCubicTo,
            'Q' => Self::QuadraticTo,
            'T' => Self::SmoothQuadraticTo,
            'A' => Self::ArcTo,
            _ => return None,
        };
        Some(code)
    }

    /// The absolute (uppercase) letter for this command.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::ClosePath => 'Z',
            Self::LineTo => 'L',
            Self::HorizontalLineTo => 'H',
            Self::VerticalLineTo => 'V',
            Self::CubicTo => 'C',
            Self::SmoothCubicTo => 'S',
            Self::QuadraticTo => 'Q',
            Self::SmoothQuadraticTo => 'T',
            Self::ArcTo => 'A',
        }
    }

    /// Number of operand tokens one operation of this command consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::ClosePath => 0,
            Self::HorizontalLineTo | Self::VerticalLineTo => 1,
            Self::MoveTo | Self::LineTo | Self::SmoothQuadraticTo => 2,
            Self::SmoothCubicTo | Self::QuadraticTo => 4,
            Self::CubicTo => 6,
            Self::ArcTo => 7,
        }
    }

    const fn is_cubic_family(self) -> bool {
        matches!(self, Self::CubicTo | Self::SmoothCubicTo)
    }

    const fn is_quadratic_family(self) -> bool {
        matches!(self, Self::QuadraticTo | Self::SmoothQuadraticTo)
    }
}

/// Per-call parser state. Nothing outlives one [`Interpreter::run`].
pub(crate) struct Interpreter<'s, 't> {
    source: &'s str,
    tokens: &'t [Token<'s>],
    pos: usize,
    cursor: Point,
    subpath_start: Point,
    active: Option<CommandCode>,
    /// The operation executed just before the current one.
    previous: Option<CommandCode>,
    absolute: bool,
    commands: Vec<Command>,
    move_count: usize,
    close_count: usize,
}

#[derive(Debug)]
pub(crate) struct RunOutput {
    pub commands: Vec<Command>,
    pub move_count: usize,
    pub close_count: usize,
}

impl<'s, 't> Interpreter<'s, 't> {
    pub(crate) fn new(source: &'s str, tokens: &'t [Token<'s>]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            cursor: Point::ORIGIN,
            subpath_start: Point::ORIGIN,
            active: None,
            previous: None,
            absolute: false,
            commands: Vec::new(),
            move_count: 0,
            close_count: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<RunOutput, PathError> {
        while let Some(token) = self.tokens.get(self.pos).copied() {
            let code = match token.command_letter() {
                Some(letter) => {
                    let Some(code) = CommandCode::from_letter(letter) else {
                        return Err(self.invariant(format!(
                            "token '{letter}' was classified as a command letter but has no command"
                        )));
                    };
                    self.active = Some(code);
                    self.absolute = letter.is_ascii_uppercase();
                    self.pos += 1;
                    code
                }
                None => self.active.ok_or_else(|| {
                    self.malformed(
                        &token,
                        format!(
                            "operand '{}' at byte {} has no active command",
                            token.text, token.offset
                        ),
                    )
                })?,
            };

            let operands = self.take_operands(code, &token)?;
            self.execute(code, operands)?;
            self.previous = Some(code);
        }

        Ok(RunOutput {
            commands: self.commands,
            move_count: self.move_count,
            close_count: self.close_count,
        })
    }

    /// Claim the next `code.arity()` tokens as operands.
    fn take_operands(
        &mut self,
        code: CommandCode,
        opener: &Token<'s>,
    ) -> Result<&'t [Token<'s>], PathError> {
        let arity = code.arity();
        let tokens = self.tokens;
        let available_end = (self.pos + arity).min(tokens.len());
        let window = &tokens[self.pos..available_end];

        // A letter in an operand slot is a non-numeric operand.
        if let Some(found) = window.iter().find(|token| token.is_command()) {
            return Err(self.number_format(found));
        }
        if window.len() < arity {
            let tail = Token {
                text: "",
                offset: self.source.len(),
            };
            return Err(self.malformed(
                &tail,
                format!(
                    "path data ends inside '{}' at byte {}: {arity} operands needed, {} found",
                    code.letter(),
                    opener.offset,
                    window.len()
                ),
            ));
        }

        self.pos = available_end;
        Ok(window)
    }

    fn execute(&mut self, code: CommandCode, ops: &[Token<'s>]) -> Result<(), PathError> {
        match code {
            CommandCode::MoveTo => {
                let target = self.resolve(self.pair(&ops[0], &ops[1])?);
                self.cursor = target;
                self.subpath_start = target;
                self.move_count += 1;
                // Further pairs without a new letter are implicit linetos.
                self.active = Some(CommandCode::LineTo);
            }
            CommandCode::ClosePath => {
                if self.cursor != self.subpath_start {
                    self.emit(Command::line(self.cursor, self.subpath_start));
                }
                self.close_count += 1;
                self.active = None;
            }
            CommandCode::LineTo => {
                let end = self.resolve(self.pair(&ops[0], &ops[1])?);
                self.emit(Command::line(self.cursor, end));
            }
            CommandCode::HorizontalLineTo => {
                let x = self.number(&ops[0])?;
                let x = if self.absolute { x } else { self.cursor.x + x };
                self.emit(Command::line(self.cursor, Point::new(x, self.cursor.y)));
            }
            CommandCode::VerticalLineTo => {
                let y = self.number(&ops[0])?;
                let y = if self.absolute { y } else { self.cursor.y + y };
                self.emit(Command::line(self.cursor, Point::new(self.cursor.x, y)));
            }
            CommandCode::CubicTo => {
                let control1 = self.resolve(self.pair(&ops[0], &ops[1])?);
                let control2 = self.resolve(self.pair(&ops[2], &ops[3])?);
                let end = self.resolve(self.pair(&ops[4], &ops[5])?);
                self.emit(Command::cubic(self.cursor, control1, control2, end));
            }
            CommandCode::SmoothCubicTo => {
                let control1 = self.reflected_cubic_control()?;
                let control2 = self.resolve(self.pair(&ops[0], &ops[1])?);
                let end = self.resolve(self.pair(&ops[2], &ops[3])?);
                self.emit(Command::cubic(self.cursor, control1, control2, end));
            }
            CommandCode::QuadraticTo => {
                let control = self.resolve(self.pair(&ops[0], &ops[1])?);
                let end = self.resolve(self.pair(&ops[2], &ops[3])?);
                self.emit(Command::quadratic(self.cursor, control, end));
            }
            CommandCode::SmoothQuadraticTo => {
                let control = self.reflected_quadratic_control()?;
                let end = self.resolve(self.pair(&ops[0], &ops[1])?);
                self.emit(Command::quadratic(self.cursor, control, end));
            }
            CommandCode::ArcTo => {
                let radii = self.pair(&ops[0], &ops[1])?;
                let rotation = self.number(&ops[2])?;
                let large_arc = is_flag_set(&ops[3]);
                let sweep = is_flag_set(&ops[4]);
                let end = self.resolve(self.pair(&ops[5], &ops[6])?);
                self.emit(Command::Arc {
                    start: self.cursor,
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                    end,
                });
            }
        }
        Ok(())
    }

    fn emit(&mut self, command: Command) {
        self.cursor = command.end();
        self.commands.push(command);
    }

    fn resolve(&self, point: Point) -> Point {
        if self.absolute {
            point
        } else {
            self.cursor + point
        }
    }

    fn reflected_cubic_control(&self) -> Result<Point, PathError> {
        if !self.previous.is_some_and(CommandCode::is_cubic_family) {
            return Ok(self.cursor);
        }
        match self.commands.last() {
            Some(Command::CubicBezier { control2, .. }) => {
                Ok(control2.reflect_through(self.cursor))
            }
            other => Err(self.invariant(format!(
                "smooth cubic follows a cubic operation but the last segment is {}",
                describe_segment(other)
            ))),
        }
    }

    fn reflected_quadratic_control(&self) -> Result<Point, PathError> {
        if !self.previous.is_some_and(CommandCode::is_quadratic_family) {
            return Ok(self.cursor);
        }
        match self.commands.last() {
            Some(Command::QuadraticBezier { control, .. }) => {
                Ok(control.reflect_through(self.cursor))
            }
            other => Err(self.invariant(format!(
                "smooth quadratic follows a quadratic operation but the last segment is {}",
                describe_segment(other)
            ))),
        }
    }

    fn pair(&self, x: &Token<'s>, y: &Token<'s>) -> Result<Point, PathError> {
        Ok(Point::new(self.number(x)?, self.number(y)?))
    }

    fn number(&self, token: &Token<'s>) -> Result<f32, PathError> {
        parse_number(token.text).ok_or_else(|| self.number_format(token))
    }

    fn number_format(&self, token: &Token<'s>) -> PathError {
        PathError::NumberFormat {
            token: token.text.to_string(),
            span: Span::from_bytes(self.source, token.offset, token.end()),
        }
    }

    fn malformed(&self, token: &Token<'s>, message: String) -> PathError {
        PathError::MalformedPath {
            message,
            span: Span::from_bytes(self.source, token.offset, token.end()),
        }
    }

    fn invariant(&self, message: String) -> PathError {
        error!(
            token_index = self.pos,
            segments = self.commands.len(),
            "path parser invariant violated: {message}"
        );
        PathError::InternalInvariant { message }
    }
}

/// Arc flags are set only by the literal `1`; anything else reads as unset.
fn is_flag_set(token: &Token<'_>) -> bool {
    token.text == "1"
}

fn describe_segment(segment: Option<&Command>) -> &'static str {
    segment.map_or("missing", |command| command.kind().as_str())
}
