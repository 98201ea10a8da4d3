//! Trivial tokenizer: the whole input is one term.

use std::iter;

use super::{
    DEFAULT_MAX_TERM_LENGTH, DEFAULT_MIN_TERM_LENGTH, Tokenizer, TokenizerKind, truncate_str,
};

/// Returns the input as a single term, truncated to the maximum length.
///
/// Surrounding whitespace is trimmed; input that is empty afterwards or
/// shorter than the minimum length yields no term. Useful for identifiers
/// such as URLs, where exact match is all that is needed.
#[derive(Debug, Clone)]
pub struct TrivialTokenizer {
    max_term_length: usize,
    min_term_length: usize,
}

impl TrivialTokenizer {
    pub fn with_lengths(max_term_length: usize, min_term_length: usize) -> Self {
        Self {
            max_term_length,
            min_term_length,
        }
    }

    pub fn new() -> Self {
        Self::with_lengths(DEFAULT_MAX_TERM_LENGTH, DEFAULT_MIN_TERM_LENGTH)
    }
}

impl Default for TrivialTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for TrivialTokenizer {
    type TokenIter<'a> = iter::Take<iter::Once<&'a str>>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        let input = input.trim();
        if input.is_empty() || input.len() < self.min_term_length {
            iter::once("").take(0)
        } else {
            iter::once(truncate_str(input, self.max_term_length)).take(1)
        }
    }

    fn kind(&self) -> TokenizerKind {
        TokenizerKind::Trivial
    }

    fn max_term_length(&self) -> usize {
        self.max_term_length
    }

    fn min_term_length(&self) -> usize {
        self.min_term_length
    }
}
