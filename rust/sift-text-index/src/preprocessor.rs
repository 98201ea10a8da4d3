//! Tokenization plus lemmatization, shared by indexing and query parsing.

use std::fmt;

use crate::{
    lemmatizer::{Lemmatizer, LowercaseLemmatizer},
    tokenizers::{Tokenizer, TokenizerType},
};

/// Turns raw text into the sequence of terms stored in the index.
///
/// Document text and query text must go through the same preprocessor so
/// that both sides share one vocabulary.
pub struct Preprocessor {
    tokenizer: TokenizerType,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Preprocessor {
    pub fn new(tokenizer: TokenizerType, lemmatizer: impl Lemmatizer + 'static) -> Self {
        Preprocessor {
            tokenizer,
            lemmatizer: Box::new(lemmatizer),
        }
    }

    /// Tokenizes `text` and lemmatizes every token.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .map(|token| self.lemmatizer.lemmatize(token))
            .collect()
    }

    /// Raw tokens of `text`, without lemmatization.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        self.tokenizer.tokenize(text).collect()
    }

    pub fn lemmatize(&self, token: &str) -> String {
        self.lemmatizer.lemmatize(token)
    }

    pub fn tokenizer(&self) -> &TokenizerType {
        &self.tokenizer
    }
}

/// Unicode words, lowercased.
impl Default for Preprocessor {
    fn default() -> Self {
        Preprocessor::new(TokenizerType::default(), LowercaseLemmatizer)
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("tokenizer", &self.tokenizer.name())
            .finish_non_exhaustive()
    }
}
