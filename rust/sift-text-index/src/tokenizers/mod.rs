//! Tokenizers split raw document and query text into terms.
//!
//! The same tokenizer must be used when the index is built and when queries
//! are parsed, otherwise the query vocabulary drifts away from the indexed
//! one. Tokenizers return iterators of string slices borrowed from the input;
//! normalization (case folding, lemmatization) happens afterwards in the
//! [`Preprocessor`](crate::preprocessor::Preprocessor).

pub mod trivial;
pub mod unicode_word;

use sift_common::{Result, error::Error};
pub use trivial::TrivialTokenizer;
pub use unicode_word::UnicodeWordTokenizer;

/// Default maximum length of a single term in bytes before truncation.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 128;

/// Default minimum length of a single term in bytes.
pub const DEFAULT_MIN_TERM_LENGTH: usize = 1;

/// Extracts terms from a string.
///
/// Terms longer than [`max_term_length`](Self::max_term_length) are truncated
/// at a UTF-8 character boundary. Terms shorter than
/// [`min_term_length`](Self::min_term_length) are dropped.
pub trait Tokenizer: Send + Sync {
    /// The iterator type returned by tokenize.
    type TokenIter<'a>: Iterator<Item = &'a str>
    where
        Self: 'a;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a>;

    fn kind(&self) -> TokenizerKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn max_term_length(&self) -> usize;

    fn min_term_length(&self) -> usize;
}

/// Creates a tokenizer by its configuration name with default term lengths.
///
/// # Errors
///
/// Returns an `InvalidArgument` error if the name is not recognized.
pub fn create_tokenizer(name: &str) -> Result<TokenizerType> {
    create_tokenizer_with_lengths(name, DEFAULT_MAX_TERM_LENGTH, DEFAULT_MIN_TERM_LENGTH)
}

/// Creates a tokenizer by its configuration name.
pub fn create_tokenizer_with_lengths(
    name: &str,
    max_term_length: usize,
    min_term_length: usize,
) -> Result<TokenizerType> {
    sift_common::verify_arg!(max_term_length, max_term_length > 0);
    sift_common::verify_arg!(min_term_length, min_term_length <= max_term_length);
    match name.try_into()? {
        TokenizerKind::Trivial => Ok(TokenizerType::Trivial(TrivialTokenizer::with_lengths(
            max_term_length,
            min_term_length,
        ))),
        TokenizerKind::UnicodeWord => Ok(TokenizerType::UnicodeWord(
            UnicodeWordTokenizer::with_lengths(max_term_length, min_term_length),
        )),
    }
}

/// Cuts `input` down to at most `max_term_length` bytes, backing off to the
/// previous character boundary when the limit falls inside a character.
pub(crate) fn truncate_str(input: &str, max_term_length: usize) -> &str {
    if input.len() <= max_term_length {
        return input;
    }
    let mut boundary = max_term_length;
    while boundary > 0 && !input.is_char_boundary(boundary) {
        boundary -= 1;
    }
    &input[..boundary]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    /// The whole input is a single term.
    Trivial,
    /// Words: runs of alphanumerics with a few inner punctuation characters.
    UnicodeWord,
}

impl TryFrom<&str> for TokenizerKind {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "trivial" => Ok(TokenizerKind::Trivial),
            "unicode-word" => Ok(TokenizerKind::UnicodeWord),
            _ => Err(Error::invalid_arg(
                "tokenizer",
                format!("Unrecognized tokenizer: {name}"),
            )),
        }
    }
}

impl TokenizerKind {
    pub const fn name(&self) -> &'static str {
        match self {
            TokenizerKind::Trivial => "trivial",
            TokenizerKind::UnicodeWord => "unicode-word",
        }
    }
}

/// All available tokenizers behind one type, so that the choice can be made
/// at run time while keeping the iterator-based API.
#[derive(Debug, Clone)]
pub enum TokenizerType {
    Trivial(TrivialTokenizer),
    UnicodeWord(UnicodeWordTokenizer),
}

impl Default for TokenizerType {
    fn default() -> Self {
        TokenizerType::UnicodeWord(UnicodeWordTokenizer::new())
    }
}

impl Tokenizer for TokenizerType {
    type TokenIter<'a> = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        match self {
            TokenizerType::Trivial(tokenizer) => Box::new(tokenizer.tokenize(input)),
            TokenizerType::UnicodeWord(tokenizer) => Box::new(tokenizer.tokenize(input)),
        }
    }

    fn kind(&self) -> TokenizerKind {
        match self {
            TokenizerType::Trivial(tokenizer) => tokenizer.kind(),
            TokenizerType::UnicodeWord(tokenizer) => tokenizer.kind(),
        }
    }

    fn max_term_length(&self) -> usize {
        match self {
            TokenizerType::Trivial(tokenizer) => tokenizer.max_term_length(),
            TokenizerType::UnicodeWord(tokenizer) => tokenizer.max_term_length(),
        }
    }

    fn min_term_length(&self) -> usize {
        match self {
            TokenizerType::Trivial(tokenizer) => tokenizer.min_term_length(),
            TokenizerType::UnicodeWord(tokenizer) => tokenizer.min_term_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tokenizer() {
        assert_eq!(create_tokenizer("unicode-word").unwrap().name(), "unicode-word");
        assert_eq!(create_tokenizer("trivial").unwrap().name(), "trivial");

        let err = create_tokenizer("unicode-log").unwrap_err();
        assert!(matches!(
            err.kind(),
            sift_common::error::ErrorKind::InvalidArgument { .. }
        ));
        assert!(create_tokenizer_with_lengths("trivial", 0, 0).is_err());
        assert!(create_tokenizer_with_lengths("trivial", 4, 5).is_err());
    }

    #[test]
    fn test_dispatch() {
        let tokenizer = create_tokenizer_with_lengths("unicode-word", 4, 2).unwrap();
        assert_eq!(tokenizer.max_term_length(), 4);
        assert_eq!(tokenizer.min_term_length(), 2);
        let terms: Vec<&str> = tokenizer.tokenize("a quick fox").collect();
        assert_eq!(terms, vec!["quic", "fox"]);
    }

    #[test]
    fn test_truncation_at_character_boundaries() {
        let long_term = "a".repeat(150);
        assert_eq!(truncate_str(&long_term, DEFAULT_MAX_TERM_LENGTH).len(), 128);

        // Cyrillic letters take two bytes each.
        assert_eq!(truncate_str("Привет", 5), "Пр");
        assert_eq!(truncate_str("你好世界", 7), "你好");
        assert_eq!(truncate_str("short", 10), "short");
    }
}
