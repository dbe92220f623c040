//! Literal decoding
//!
//! Turns the raw text of a bare, single-quoted or double-quoted token into
//! the text it denotes.
//!
//! - Bare words are taken verbatim.
//! - Single-quoted literals drop their delimiters; a doubled delimiter
//!   inside stands for one literal delimiter. Nothing else is special.
//! - Double-quoted literals use the usual backslash escapes.

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Failure to decode a quoted literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid literal {literal}: {reason}")]
pub struct DecodeError {
    /// Raw text of the offending token
    pub literal: String,
    pub reason: DecodeErrorReason,
}

/// Why a literal failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorReason {
    #[error("missing delimiters")]
    MissingDelimiters,
    #[error("unknown escape sequence `\\{0}`")]
    UnknownEscape(char),
    #[error("truncated escape sequence")]
    TruncatedEscape,
    #[error("escaped value {0:#x} is not a valid character")]
    InvalidCodePoint(u32),
    #[error("octal escape value {0:#o} is out of range")]
    OctalOutOfRange(u32),
    #[error("unescaped `{0}` inside literal")]
    Unescaped(char),
    #[error("escaped bytes are not valid UTF-8")]
    InvalidUtf8,
    #[error("token kind {0:?} is not a literal")]
    NotALiteral(TokenKind),
}

impl DecodeError {
    fn new(literal: &str, reason: DecodeErrorReason) -> Self {
        Self {
            literal: literal.to_string(),
            reason,
        }
    }
}

/// Decode a literal token into its semantic text.
pub fn decode(token: &Token) -> Result<String, DecodeError> {
    match token.kind {
        TokenKind::Bare => Ok(token.text.clone()),
        TokenKind::SingleQuoted => decode_single(&token.text),
        TokenKind::DoubleQuoted => decode_double(&token.text),
        kind => Err(DecodeError::new(
            &token.text,
            DecodeErrorReason::NotALiteral(kind),
        )),
    }
}

/// Strip the delimiters of a single-quoted literal and collapse doubled
/// delimiters. The delimiter is the first character of `raw`.
pub fn decode_single(raw: &str) -> Result<String, DecodeError> {
    let Some(delim) = raw.chars().next() else {
        return Err(DecodeError::new(raw, DecodeErrorReason::MissingDelimiters));
    };
    let width = delim.len_utf8();
    if raw.len() < 2 * width || !raw.ends_with(delim) {
        return Err(DecodeError::new(raw, DecodeErrorReason::MissingDelimiters));
    }
    let inner = &raw[width..raw.len() - width];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == delim && chars.peek() == Some(&delim) {
            chars.next();
        }
    }
    Ok(out)
}

/// Decode a double-quoted literal with backslash escapes.
pub fn decode_double(raw: &str) -> Result<String, DecodeError> {
    let fail = |reason: DecodeErrorReason| DecodeError::new(raw, reason);

    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| fail(DecodeErrorReason::MissingDelimiters))?;

    // Fast path: nothing to unescape
    if !inner.contains(['\\', '"', '\n']) {
        return Ok(inner.to_string());
    }

    // \x and octal escapes produce raw bytes, so collect bytes and validate
    // UTF-8 once at the end.
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return Err(fail(DecodeErrorReason::Unescaped(c))),
            '\\' => {
                let esc = chars
                    .next()
                    .ok_or_else(|| fail(DecodeErrorReason::TruncatedEscape))?;
                match esc {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => {
                        let value = hex_digits(&mut chars, 2).map_err(fail)?;
                        out.push(value as u8);
                    }
                    'u' | 'U' => {
                        let width = if esc == 'u' { 4 } else { 8 };
                        let value = hex_digits(&mut chars, width).map_err(fail)?;
                        let ch = char::from_u32(value)
                            .ok_or_else(|| fail(DecodeErrorReason::InvalidCodePoint(value)))?;
                        push_char(&mut out, ch);
                    }
                    '0'..='7' => {
                        let mut value = esc.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            let digit = chars
                                .next()
                                .and_then(|d| d.to_digit(8))
                                .ok_or_else(|| fail(DecodeErrorReason::TruncatedEscape))?;
                            value = value * 8 + digit;
                        }
                        if value > 0o377 {
                            return Err(fail(DecodeErrorReason::OctalOutOfRange(value)));
                        }
                        out.push(value as u8);
                    }
                    other => return Err(fail(DecodeErrorReason::UnknownEscape(other))),
                }
            }
            c => push_char(&mut out, c),
        }
    }

    String::from_utf8(out).map_err(|_| fail(DecodeErrorReason::InvalidUtf8))
}

fn hex_digits(chars: &mut std::str::Chars<'_>, count: usize) -> Result<u32, DecodeErrorReason> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or(DecodeErrorReason::TruncatedEscape)?;
        value = value
            .checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or(DecodeErrorReason::InvalidCodePoint(value))?;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reason(result: Result<String, DecodeError>) -> DecodeErrorReason {
        result.unwrap_err().reason
    }

    #[test]
    fn test_bare_is_verbatim() {
        let token = Token::new(TokenKind::Bare, "a\\nb", 0);
        assert_eq!(decode(&token).unwrap(), "a\\nb");
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(decode_single("'hello world'").unwrap(), "hello world");
        assert_eq!(decode_single("''").unwrap(), "");
        assert_eq!(decode_single("'a\\nb'").unwrap(), "a\\nb");
    }

    #[test]
    fn test_single_quoted_doubled_delimiter() {
        assert_eq!(decode_single("'don''t'").unwrap(), "don't");
        assert_eq!(decode_single("''''").unwrap(), "'");
        assert_eq!(decode_single("'a''''b'").unwrap(), "a''b");
    }

    #[test]
    fn test_single_quoted_other_delimiter() {
        assert_eq!(decode_single("`it``s`").unwrap(), "it`s");
        assert_eq!(decode_single("`it's`").unwrap(), "it's");
    }

    #[test]
    fn test_single_quoted_missing_delimiters() {
        assert_eq!(
            reason(decode_single("'")),
            DecodeErrorReason::MissingDelimiters
        );
        assert_eq!(
            reason(decode_single("'abc")),
            DecodeErrorReason::MissingDelimiters
        );
        assert_eq!(
            reason(decode_single("")),
            DecodeErrorReason::MissingDelimiters
        );
    }

    #[test]
    fn test_double_quoted_simple() {
        assert_eq!(decode_double("\"hello\"").unwrap(), "hello");
        assert_eq!(decode_double("\"\"").unwrap(), "");
        assert_eq!(decode_double("\"it's\"").unwrap(), "it's");
    }

    #[test]
    fn test_double_quoted_control_escapes() {
        assert_eq!(decode_double(r#""a\nb""#).unwrap(), "a\nb");
        assert_eq!(decode_double(r#""\t\r\v\f\a\b""#).unwrap(), "\t\r\x0b\x0c\x07\x08");
        assert_eq!(decode_double(r#""\\ \"""#).unwrap(), "\\ \"");
    }

    #[test]
    fn test_double_quoted_numeric_escapes() {
        assert_eq!(decode_double(r#""\x41\102""#).unwrap(), "AB");
        assert_eq!(decode_double(r#""\u00e9""#).unwrap(), "é");
        assert_eq!(decode_double(r#""\U0001F600""#).unwrap(), "😀");
        // UTF-8 bytes spelled out one at a time
        assert_eq!(decode_double(r#""\xc3\xa9""#).unwrap(), "é");
    }

    #[test]
    fn test_double_quoted_errors() {
        assert_eq!(
            reason(decode_double(r#""\q""#)),
            DecodeErrorReason::UnknownEscape('q')
        );
        assert_eq!(
            reason(decode_double(r#""\'""#)),
            DecodeErrorReason::UnknownEscape('\'')
        );
        assert_eq!(
            reason(decode_double(r#""\x4""#)),
            DecodeErrorReason::TruncatedEscape
        );
        assert_eq!(
            reason(decode_double(r#""\ud800""#)),
            DecodeErrorReason::InvalidCodePoint(0xd800)
        );
        assert_eq!(
            reason(decode_double(r#""\777""#)),
            DecodeErrorReason::OctalOutOfRange(0o777)
        );
        assert_eq!(
            reason(decode_double(r#""\xff""#)),
            DecodeErrorReason::InvalidUtf8
        );
        assert_eq!(
            reason(decode_double("\"a\nb\"")),
            DecodeErrorReason::Unescaped('\n')
        );
        assert_eq!(
            reason(decode_double(r#""a"b""#)),
            DecodeErrorReason::Unescaped('"')
        );
        assert_eq!(
            reason(decode_double("\"")),
            DecodeErrorReason::MissingDelimiters
        );
    }

    #[test]
    fn test_trailing_backslash() {
        // The closing quote is escaped, leaving an unterminated literal
        assert_eq!(
            reason(decode_double(r#""abc\""#)),
            DecodeErrorReason::TruncatedEscape
        );
    }

    #[test]
    fn test_error_names_literal() {
        let err = decode_double(r#""\q""#).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid literal "\q": unknown escape sequence `\q`"#);
    }

    #[test]
    fn test_non_literal_kind() {
        let token = Token::new(TokenKind::Pipe, "|", 0);
        assert_eq!(
            reason(decode(&token)),
            DecodeErrorReason::NotALiteral(TokenKind::Pipe)
        );
    }
}
