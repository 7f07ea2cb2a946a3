//! Recognition of quoted string literals in raw values.
//!
//! Only string literals are understood; any other expression is reported as
//! [`LiteralError::NotQuoted`] so callers can treat it as "unknown".

use thiserror::Error;

/// Error type for string-literal parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// The value does not start with a double quote.
    #[error("Not a string literal: {0}")]
    NotQuoted(String),

    /// The closing quote is missing.
    #[error("Unterminated string literal")]
    Unterminated,

    /// An unknown or incomplete backslash escape.
    #[error("Invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// Something other than whitespace follows the closing quote.
    #[error("Unexpected text after string literal: {0}")]
    TrailingText(String),
}

/// Parses a double-quoted string literal, resolving backslash escapes.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns an error if the value is not exactly one well-formed literal.
///
/// # Examples
///
/// ```
/// use ini_resolve::literal::parse_quoted_string;
///
/// assert_eq!(parse_quoted_string(r#" "Ieee80211Nic" "#).unwrap(), "Ieee80211Nic");
/// assert_eq!(parse_quoted_string(r#""a\"b""#).unwrap(), "a\"b");
/// assert!(parse_quoted_string("uniform(1,2)").is_err());
/// ```
pub fn parse_quoted_string(value: &str) -> Result<String, LiteralError> {
    let trimmed = value.trim();
    let mut chars = trimmed.char_indices();
    if chars.next().map(|(_, c)| c) != Some('"') {
        return Err(LiteralError::NotQuoted(trimmed.to_string()));
    }

    let mut result = String::new();
    while let Some((pos, ch)) = chars.next() {
        match ch {
            '"' => {
                let rest = &trimmed[pos + 1..];
                return if rest.is_empty() {
                    Ok(result)
                } else {
                    Err(LiteralError::TrailingText(rest.to_string()))
                };
            }
            '\\' => {
                let (_, escaped) = chars.next().ok_or(LiteralError::Unterminated)?;
                result.push(unescape(escaped)?);
            }
            c => result.push(c),
        }
    }
    Err(LiteralError::Unterminated)
}

fn unescape(ch: char) -> Result<char, LiteralError> {
    match ch {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{c}'),
        '0' => Ok('\0'),
        '"' | '\'' | '\\' | '?' => Ok(ch),
        other => Err(LiteralError::InvalidEscape(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_literal() {
        assert_eq!(parse_quoted_string("\"Router\"").unwrap(), "Router");
    }

    #[test]
    fn empty_literal() {
        assert_eq!(parse_quoted_string("\"\"").unwrap(), "");
    }

    #[test]
    fn escapes_are_resolved() {
        assert_eq!(parse_quoted_string(r#""a\tb\\c\n""#).unwrap(), "a\tb\\c\n");
    }

    #[test]
    fn unknown_escape_is_rejected() {
        assert_eq!(
            parse_quoted_string(r#""a\qb""#),
            Err(LiteralError::InvalidEscape('q'))
        );
    }

    #[test]
    fn bare_identifier_is_not_quoted() {
        assert!(matches!(
            parse_quoted_string("nicType"),
            Err(LiteralError::NotQuoted(_))
        ));
    }

    #[test]
    fn missing_closing_quote() {
        assert_eq!(parse_quoted_string("\"abc"), Err(LiteralError::Unterminated));
        assert_eq!(parse_quoted_string("\"abc\\"), Err(LiteralError::Unterminated));
    }

    #[test]
    fn concatenation_is_not_a_literal() {
        assert_eq!(
            parse_quoted_string(r#""a" + "b""#),
            Err(LiteralError::TrailingText(" + \"b\"".to_string()))
        );
    }
}
