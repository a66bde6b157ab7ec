//! Quote-aware splitting of a cURL command line into tokens.
//!
//! Tokens keep their quote characters; the flag interpreter strips them with
//! [`strip_quotes`] once it knows a token is an argument.

use super::error::ParseError;
use log::warn;

/// What to do with a quote that is never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnterminatedQuote {
    /// The rest of the input becomes part of the last token.
    #[default]
    TakeRest,
    /// Report [`ParseError::UnterminatedQuote`].
    Reject,
}

/// Tokenizer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizerOptions {
    /// Also group single-quoted spans. Off by default: only double quotes
    /// group whitespace.
    pub single_quotes: bool,
    pub unterminated: UnterminatedQuote,
}

impl TokenizerOptions {
    /// POSIX-shell-like grouping: both quote characters are honored.
    pub fn shell() -> Self {
        Self {
            single_quotes: true,
            ..Self::default()
        }
    }
}

/// Tokenizes with the default options. Never fails.
pub fn tokenize(input: &str) -> Vec<String> {
    let (tokens, _) = split(input, &TokenizerOptions::default());
    tokens
}

/// Tokenizes with explicit options.
pub fn tokenize_with(input: &str, options: &TokenizerOptions) -> Result<Vec<String>, ParseError> {
    let (tokens, open_quote) = split(input, options);

    if let Some((quote, position)) = open_quote {
        match options.unterminated {
            UnterminatedQuote::Reject => {
                return Err(ParseError::UnterminatedQuote { quote, position })
            }
            UnterminatedQuote::TakeRest => {
                warn!(
                    "unterminated {} quote at byte {}, keeping the rest as one token",
                    quote, position
                );
            }
        }
    }

    Ok(tokens)
}

/// Splits `input`, returning the tokens and the still-open quote, if any.
fn split(input: &str, options: &TokenizerOptions) -> (Vec<String>, Option<(char, usize)>) {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<(char, usize)> = None;
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        // Line continuations are plain whitespace
        let ch = match continuation_len(&input[pos..]) {
            0 => ch,
            len => {
                chars.nth(len - 2);
                ' '
            }
        };

        match quote {
            Some((open, _)) => {
                current.push(ch);
                if ch == '\\' && open == '"' {
                    if let Some((_, next)) = chars.next() {
                        current.push(next);
                    }
                } else if ch == open {
                    quote = None;
                }
            }
            None => {
                if ch.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else {
                    if ch == '"' || (ch == '\'' && options.single_quotes) {
                        quote = Some((ch, pos));
                    }
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    (tokens, quote)
}

/// Byte length of a `\`+newline continuation at the start of `rest`, or 0.
fn continuation_len(rest: &str) -> usize {
    if rest.starts_with("\\\r\n") {
        3
    } else if rest.starts_with("\\\n") {
        2
    } else {
        0
    }
}

/// Removes one pair of surrounding quotes from a token.
///
/// Double-quoted text also has its shell escapes (`\"`, `\\`, `\$`, `` \` ``)
/// resolved. A lone leading quote (from an unterminated span) is dropped.
pub fn strip_quotes(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(q @ ('"' | '\'')) => {
            let inner = chars.as_str();
            let inner = inner.strip_suffix(q).unwrap_or(inner);
            if q == '"' {
                unescape_double_quoted(inner)
            } else {
                inner.to_string()
            }
        }
        _ => token.to_string(),
    }
}

fn unescape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\\' | '$' | '`') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }

    out
}
