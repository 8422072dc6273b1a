//! Bounded whitespace tokenizer.
//!
//! Splits a command line into at most `MT` borrowed spans. The input is
//! not mutated; tokens are non-overlapping slices of the original line.

use heapless::Vec;
use thiserror::Error;

/// Tokenization failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenizeError {
    /// Non-whitespace content remained after the token capacity was
    /// reached. Trailing whitespace alone does not trigger this.
    #[error("too many tokens")]
    TooManyTokens,
}

/// Space, tab, carriage return, or newline.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split `line` into whitespace-delimited tokens.
///
/// Runs of separators collapse. A line that is empty or all whitespace
/// yields zero tokens; deciding whether that is an error is the caller's
/// concern. Once `MT` tokens have been recognized, any further
/// non-whitespace content fails the whole call with
/// [`TokenizeError::TooManyTokens`].
pub fn tokenize<const MT: usize>(line: &str) -> Result<Vec<&str, MT>, TokenizeError> {
    let mut tokens: Vec<&str, MT> = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            return Ok(tokens);
        }

        let end = rest.find(is_separator).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        if tokens.push(token).is_err() {
            return Err(TokenizeError::TooManyTokens);
        }
        rest = tail;
    }
}

// ==================== TESTS =======================
