//! Wildcard key pattern compilation and matching.
//!
//! Patterns are compiled into a flat token list and matched against the
//! whole parameter path with memoized backtracking, so `*`/`**` runs never
//! blow up exponentially.

use std::collections::HashSet;

use thiserror::Error;

/// Error type for pattern compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `[` or `{` group was never closed.
    #[error("Unclosed '{opener}' at offset {offset}")]
    Unclosed {
        /// The opening bracket
        opener: char,
        /// Character offset of the opening bracket
        offset: usize,
    },

    /// A `[]` or `{}` group has no content.
    #[error("Empty '{opener}' group at offset {offset}")]
    EmptyGroup {
        /// The opening bracket
        opener: char,
        /// Character offset of the opening bracket
        offset: usize,
    },

    /// A range bound or index is not a decimal number.
    #[error("Invalid number '{text}' in range")]
    InvalidNumber {
        /// The offending bound text
        text: String,
    },

    /// The pattern ends with a lone backslash.
    #[error("Dangling escape at end of pattern")]
    DanglingEscape,
}

/// Inclusive numeric range with optional open ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumRange {
    lo: Option<u64>,
    hi: Option<u64>,
}

impl NumRange {
    fn contains(self, n: u64) -> bool {
        self.lo.is_none_or(|lo| n >= lo) && self.hi.is_none_or(|hi| n <= hi)
    }

    fn parse(text: &str) -> Result<Self, PatternError> {
        let bound = |s: &str| -> Result<Option<u64>, PatternError> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<u64>()
                .map(Some)
                .map_err(|_| PatternError::InvalidNumber {
                    text: s.to_string(),
                })
        };

        match text.split_once("..") {
            Some((lo, hi)) => Ok(Self {
                lo: bound(lo)?,
                hi: bound(hi)?,
            }),
            None => {
                let n = bound(text)?.ok_or_else(|| PatternError::InvalidNumber {
                    text: text.to_string(),
                })?;
                Ok(Self {
                    lo: Some(n),
                    hi: Some(n),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// A character that must appear verbatim.
    Literal(char),
    /// `?`
    AnyChar,
    /// `*`
    Star,
    /// `**`
    DoubleStar,
    /// `{a,b,c}`
    Choice(Vec<Vec<char>>),
    /// `{n..m}`
    Number(NumRange),
    /// `[*]`
    AnyIndex,
    /// `[n]`, `[n..m]`, `[a,b..c]`
    Index(Vec<NumRange>),
}

/// A compiled key pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error for unclosed or empty groups, non-numeric range
    /// bounds and a trailing backslash.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' => {
                    let escaped = *chars.get(i + 1).ok_or(PatternError::DanglingEscape)?;
                    tokens.push(Token::Literal(escaped));
                    i += 2;
                }
                '?' => {
                    tokens.push(Token::AnyChar);
                    i += 1;
                }
                '*' if chars.get(i + 1) == Some(&'*') => {
                    tokens.push(Token::DoubleStar);
                    i += 2;
                }
                '*' => {
                    tokens.push(Token::Star);
                    i += 1;
                }
                opener @ ('[' | '{') => {
                    let closer = if opener == '[' { ']' } else { '}' };
                    let end = chars[i + 1..]
                        .iter()
                        .position(|&c| c == closer)
                        .map(|p| i + 1 + p)
                        .ok_or(PatternError::Unclosed { opener, offset: i })?;
                    let body: String = chars[i + 1..end].iter().collect();
                    if body.trim().is_empty() {
                        return Err(PatternError::EmptyGroup { opener, offset: i });
                    }
                    tokens.push(if opener == '[' {
                        index_token(&body)?
                    } else {
                        brace_token(&body)?
                    });
                    i = end + 1;
                }
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Ok(Self { tokens })
    }

    /// Returns true if the pattern matches the whole path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let text: Vec<char> = path.chars().collect();
        let mut run = MatchRun {
            tokens: &self.tokens,
            text: &text,
            failed: HashSet::new(),
        };
        run.match_at(0, 0)
    }
}

fn index_token(body: &str) -> Result<Token, PatternError> {
    if body.trim() == "*" {
        return Ok(Token::AnyIndex);
    }
    body.split(',')
        .map(NumRange::parse)
        .collect::<Result<Vec<_>, _>>()
        .map(Token::Index)
}

fn brace_token(body: &str) -> Result<Token, PatternError> {
    if body.contains("..") {
        return NumRange::parse(body).map(Token::Number);
    }
    Ok(Token::Choice(
        body.split(',').map(|alt| alt.chars().collect()).collect(),
    ))
}

/// State of one match attempt: remembers `(token, position)` pairs that failed.
struct MatchRun<'a> {
    tokens: &'a [Token],
    text: &'a [char],
    failed: HashSet<(usize, usize)>,
}

impl MatchRun<'_> {
    fn match_at(&mut self, ti: usize, pi: usize) -> bool {
        if ti == self.tokens.len() {
            return pi == self.text.len();
        }
        if self.failed.contains(&(ti, pi)) {
            return false;
        }
        let matched = self.match_token(ti, pi);
        if !matched {
            self.failed.insert((ti, pi));
        }
        matched
    }

    fn match_token(&mut self, ti: usize, pi: usize) -> bool {
        let (tokens, text) = (self.tokens, self.text);
        let rest = &text[pi..];
        match &tokens[ti] {
            Token::Literal(c) => rest.first() == Some(c) && self.match_at(ti + 1, pi + 1),
            Token::AnyChar => {
                rest.first().is_some_and(|&c| c != '.') && self.match_at(ti + 1, pi + 1)
            }
            Token::Star => {
                let run = rest.iter().take_while(|&&c| c != '.').count();
                (0..=run).any(|k| self.match_at(ti + 1, pi + k))
            }
            Token::DoubleStar => (0..=rest.len()).any(|k| self.match_at(ti + 1, pi + k)),
            Token::Choice(alts) => alts
                .iter()
                .any(|alt| rest.starts_with(alt) && self.match_at(ti + 1, pi + alt.len())),
            Token::Number(range) => {
                let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
                (1..=digits).rev().any(|len| {
                    parse_digits(&rest[..len]).is_some_and(|n| range.contains(n))
                        && self.match_at(ti + 1, pi + len)
                })
            }
            Token::AnyIndex => {
                index_width(rest, |_| true).is_some_and(|w| self.match_at(ti + 1, pi + w))
            }
            Token::Index(ranges) => index_width(rest, |n| ranges.iter().any(|r| r.contains(n)))
                .is_some_and(|w| self.match_at(ti + 1, pi + w)),
        }
    }
}

/// Measures a path-side index (`[7]` or the wildcard `[*]`) at the start of
/// `text`, returning its width when it is accepted.
///
/// A wildcard index is accepted by every index token because the pattern
/// then addresses at least some of the elements.
fn index_width(text: &[char], accepts: impl Fn(u64) -> bool) -> Option<usize> {
    if text.first() != Some(&'[') {
        return None;
    }
    if text.get(1) == Some(&'*') && text.get(2) == Some(&']') {
        return Some(3);
    }
    let digits = text[1..].iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || text.get(1 + digits) != Some(&']') {
        return None;
    }
    parse_digits(&text[1..=digits])
        .filter(|&n| accepts(n))
        .map(|_| digits + 2)
}

fn parse_digits(digits: &[char]) -> Option<u64> {
    digits.iter().collect::<String>().parse().ok()
}
