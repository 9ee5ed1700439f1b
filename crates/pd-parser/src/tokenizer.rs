//! Context-free splitting of path data into command letters and operands.
//!
//! The input is first cut into command chunks at every command letter. Each
//! chunk then yields its leading letter (if any) followed by the numeric
//! operands found in the rest of the chunk. Numbers need no delimiter when
//! the float grammar already separates them (`1.5.5` is `1.5` then `.5`,
//! `10-5` is `10` then `-5`).
//!
//! Text that is neither a separator nor part of a number is kept as one
//! opaque token so the interpreter can reject it with a positioned error.

use serde::Serialize;

/// Command letters of the path data grammar, absolute and relative.
pub const COMMAND_LETTERS: &str = "MmZzLlHhVvCcSsQqTtAa";

/// A single token borrowed from the source, with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.text
    }

    /// Byte offset one past the last byte of the token.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// The command letter this token consists of, if it is one.
    #[must_use]
    pub fn command_letter(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if is_command_letter(letter) => Some(letter),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_command(&self) -> bool {
        self.command_letter().is_some()
    }
}

#[must_use]
pub fn is_command_letter(ch: char) -> bool {
    COMMAND_LETTERS.contains(ch)
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

/// Split a path data string into tokens, in order of appearance.
///
/// Never produces an empty token. Offsets are relative to `d`.
#[must_use]
pub fn tokenize_path(d: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chunk_start = 0;

    for (index, ch) in d.char_indices() {
        if is_command_letter(ch) && index > chunk_start {
            push_chunk(d, chunk_start, index, &mut tokens);
            chunk_start = index;
        }
    }
    push_chunk(d, chunk_start, d.len(), &mut tokens);

    tokens
}

/// Split one command chunk (a command letter followed by its operands) into
/// tokens. Offsets are relative to `chunk`.
///
/// ```
/// use pd_parser::split_command;
///
/// let tokens: Vec<&str> = split_command(" m +100  -1 ").iter().map(|t| t.text).collect();
/// assert_eq!(tokens, ["m", "+100", "-1"]);
/// ```
#[must_use]
pub fn split_command(chunk: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    push_chunk(chunk, 0, chunk.len(), &mut tokens);
    tokens
}

fn push_chunk<'a>(source: &'a str, start: usize, end: usize, tokens: &mut Vec<Token<'a>>) {
    let chunk = &source[start..end];
    let leading = chunk.len() - chunk.trim_start().len();
    let mut operands_start = start + leading;

    if let Some(letter) = chunk[leading..].chars().next()
        && is_command_letter(letter)
    {
        let letter_end = operands_start + letter.len_utf8();
        tokens.push(Token {
            text: &source[operands_start..letter_end],
            offset: operands_start,
        });
        operands_start = letter_end;
    }

    push_operands(source, operands_start, end, tokens);
}

fn push_operands<'a>(source: &'a str, start: usize, end: usize, tokens: &mut Vec<Token<'a>>) {
    let bytes = &source.as_bytes()[..end];
    let mut gap_start = start;
    let mut pos = start;

    while pos < end {
        match float_match_len(bytes, pos) {
            Some(len) => {
                push_gap(source, gap_start, pos, tokens);
                tokens.push(Token {
                    text: &source[pos..pos + len],
                    offset: pos,
                });
                pos += len;
                gap_start = pos;
            }
            None => pos += 1,
        }
    }

    push_gap(source, gap_start, end, tokens);
}

/// Emit whatever non-separator text lies between two numbers as one token.
fn push_gap<'a>(source: &'a str, start: usize, end: usize, tokens: &mut Vec<Token<'a>>) {
    let gap = &source[start..end];
    let trimmed_start = gap.trim_start_matches(is_separator);
    let text = trimmed_start.trim_end_matches(is_separator);
    if text.is_empty() {
        return;
    }
    tokens.push(Token {
        text,
        offset: start + (gap.len() - trimmed_start.len()),
    });
}

/// Length of the longest float literal starting at `start`, if any.
///
/// Grammar: `[-+]? digits? ('.' digits)? ([eE] [-+]? digits)?` with at least
/// one digit in the mantissa. A trailing `.` without fraction digits is not
/// part of the match, so `5.` matches `5`.
pub(crate) fn float_match_len(bytes: &[u8], start: usize) -> Option<usize> {
    let digits_from = |mut index: usize| {
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        index
    };

    let mut index = start;
    if matches!(bytes.get(index), Some(b'+' | b'-')) {
        index += 1;
    }

    let int_end = digits_from(index);
    let has_int = int_end > index;

    let mut mantissa_end = None;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if frac_end > int_end + 1 {
            mantissa_end = Some(frac_end);
        }
    }
    let mut end = match mantissa_end {
        Some(frac_end) => frac_end,
        None if has_int => int_end,
        None => return None,
    };

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_index = end + 1;
        if matches!(bytes.get(exp_index), Some(b'+' | b'-')) {
            exp_index += 1;
        }
        let exp_end = digits_from(exp_index);
        if exp_end > exp_index {
            end = exp_end;
        }
    }

    Some(end - start)
}

/// Parse a token as a float, accepting only the path data number grammar.
///
/// Rejects spellings that `str::parse` would otherwise accept, such as `inf`
/// or `NaN`, and literals outside the finite `f32` range.
pub(crate) fn parse_number(text: &str) -> Option<f32> {
    if float_match_len(text.as_bytes(), 0) != Some(text.len()) {
        return None;
    }
    text.parse::<f32>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{Token, float_match_len, parse_number, split_command, tokenize_path};

    /// First float match anywhere in `input`, mimicking a regex `find`.
    fn find_float(input: &str) -> Option<&str> {
        let bytes = input.as_bytes();
        (0..bytes.len()).find_map(|start| {
            float_match_len(bytes, start).map(|len| &input[start..start + len])
        })
    }

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|token| token.text).collect()
    }

    #[test]
    fn float_grammar_finds_leftmost_literal() {
        assert_eq!(find_float("100"), Some("100"));
        assert_eq!(find_float(" 100L"), Some("100"));
        assert_eq!(find_float(" 1 "), Some("1"));
        assert_eq!(find_float("100.5"), Some("100.5"));
        assert_eq!(find_float("+1"), Some("+1"));
        assert_eq!(find_float("+1.5"), Some("+1.5"));
        assert_eq!(find_float("  -5 "), Some("-5"));
        assert_eq!(find_float("-0.5"), Some("-0.5"));
        assert_eq!(find_float("A10B"), Some("10"));
        assert_eq!(find_float("1e10"), Some("1e10"));
        assert_eq!(find_float(" 1e-10"), Some("1e-10"));
        assert_eq!(find_float("abc"), None);
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        assert_eq!(find_float("5."), Some("5"));
        assert_eq!(find_float(".5"), Some(".5"));
        assert_eq!(find_float("-."), None);
    }

    #[test]
    fn incomplete_exponent_is_left_out() {
        assert_eq!(find_float("2e"), Some("2"));
        assert_eq!(find_float("2e+"), Some("2"));
        assert_eq!(find_float("2E+3"), Some("2E+3"));
    }

    #[test]
    fn split_command_separates_letter_and_operands() {
        assert_eq!(texts(&split_command("M1 1")), ["M", "1", "1"]);
        assert_eq!(texts(&split_command("m 100  -1 ")), ["m", "100", "-1"]);
        assert_eq!(texts(&split_command(" m +100  -1 ")), ["m", "+100", "-1"]);
        assert_eq!(texts(&split_command("Z")), ["Z"]);
        assert_eq!(texts(&split_command("Z ")), ["Z"]);
        assert_eq!(texts(&split_command(" Z ")), ["Z"]);
        assert_eq!(texts(&split_command("M1,1")), ["M", "1", "1"]);
        assert_eq!(texts(&split_command("M 1, 1")), ["M", "1", "1"]);
    }

    #[test]
    fn adjacent_numbers_split_on_grammar_boundaries() {
        assert_eq!(texts(&split_command("L1.5.5")), ["L", "1.5", ".5"]);
        assert_eq!(texts(&split_command("L10-5")), ["L", "10", "-5"]);
        assert_eq!(texts(&split_command("l-1-2")), ["l", "-1", "-2"]);
    }

    #[test]
    fn tokenize_cuts_at_every_command_letter() {
        let tokens = tokenize_path("M100 100L200 200z");
        assert_eq!(texts(&tokens), ["M", "100", "100", "L", "200", "200", "z"]);
    }

    #[test]
    fn tokenize_records_byte_offsets() {
        let source = "M 10,20 L30 40";
        let tokens = tokenize_path(source);
        for token in &tokens {
            assert_eq!(&source[token.offset..token.end()], token.text);
        }
        assert_eq!(tokens[3].offset, 8);
        assert!(tokens[3].is_command());
        assert!(!tokens[1].is_command());
    }

    #[test]
    fn exponent_stays_in_one_token() {
        assert_eq!(texts(&tokenize_path("1e-10")), ["1e-10"]);
    }

    #[test]
    fn unrecognized_text_becomes_one_opaque_token() {
        assert_eq!(texts(&tokenize_path("M foo")), ["M", "foo"]);
        assert_eq!(texts(&tokenize_path("M 1 foo 2")), ["M", "1", "foo", "2"]);
        assert_eq!(texts(&tokenize_path("M 1 ,foo, 2")), ["M", "1", "foo", "2"]);
    }

    #[test]
    fn stray_sign_is_kept_for_rejection() {
        assert_eq!(texts(&tokenize_path("L1-")), ["L", "1", "-"]);
    }

    #[test]
    fn empty_and_blank_inputs_have_no_tokens() {
        assert!(tokenize_path("").is_empty());
        assert!(tokenize_path("  \n\t, ").is_empty());
    }

    #[test]
    fn leading_operands_without_letter_are_tokenized() {
        assert_eq!(texts(&tokenize_path("  1 2 M3 4")), ["1", "2", "M", "3", "4"]);
    }

    #[test]
    fn non_ascii_text_does_not_split_mid_character() {
        let tokens = tokenize_path("M1 ü 2");
        assert_eq!(texts(&tokens), ["M", "1", "ü", "2"]);
    }

    #[test]
    fn parse_number_accepts_only_path_numbers() {
        assert_eq!(parse_number("-0.5"), Some(-0.5));
        assert_eq!(parse_number("+1"), Some(1.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1e"), None);
        assert_eq!(parse_number("1e39"), None);
        assert_eq!(parse_number("-1e39"), None);
        assert_eq!(parse_number("1e-50"), Some(0.0));
        assert_eq!(parse_number("M"), None);
        assert_eq!(parse_number(""), None);
    }
}
