//! Unicode word tokenizer.

use std::{iter::Peekable, str::CharIndices};

use super::{
    DEFAULT_MAX_TERM_LENGTH, DEFAULT_MIN_TERM_LENGTH, Tokenizer, TokenizerKind, truncate_str,
};

/// Extracts words from natural language text.
///
/// A word starts at an alphanumeric character and continues over
/// alphanumerics and the inner word characters `'`, `-`, `+` and `#`, so that
/// `don't`, `state-of-the-art`, `C++` and `C#` stay whole. A `.` is kept when
/// it sits between two letters (`e.g`) or two digits (`3.14`). Trailing `'`
/// and `-` are not part of the word. Everything else, including quote
/// characters, separates words.
#[derive(Debug, Clone)]
pub struct UnicodeWordTokenizer {
    max_term_length: usize,
    min_term_length: usize,
}

impl UnicodeWordTokenizer {
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

impl Default for UnicodeWordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator that yields word tokens from a string input.
pub struct WordTokenIterator<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    max_term_length: usize,
    min_term_length: usize,
}

impl<'a> WordTokenIterator<'a> {
    pub fn new(input: &'a str, max_term_length: usize, min_term_length: usize) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            max_term_length,
            min_term_length,
        }
    }

    /// Scans the next raw word, returning its byte range.
    fn next_word(&mut self) -> Option<(usize, usize)> {
        let (start, first) = self.chars.find(|(_, ch)| ch.is_alphanumeric())?;
        let mut end = start + first.len_utf8();
        let mut prev = first;

        while let Some(&(pos, ch)) = self.chars.peek() {
            let keep = if ch == '.' {
                let next = self.input[pos + 1..].chars().next();
                next.is_some_and(|next| {
                    (prev.is_alphabetic() && next.is_alphabetic())
                        || (prev.is_numeric() && next.is_numeric())
                })
            } else {
                is_word_char(ch)
            };
            if !keep {
                break;
            }
            self.chars.next();
            end = pos + ch.len_utf8();
            prev = ch;
        }
        Some((start, end))
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '\'' | '-' | '+' | '#')
}

impl<'a> Iterator for WordTokenIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (start, end) = self.next_word()?;
            let word = self.input[start..end].trim_end_matches(['\'', '-']);
            if word.len() >= self.min_term_length {
                return Some(truncate_str(word, self.max_term_length));
            }
        }
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    type TokenIter<'a> = WordTokenIterator<'a>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        WordTokenIterator::new(input, self.max_term_length, self.min_term_length)
    }

    fn kind(&self) -> TokenizerKind {
        TokenizerKind::UnicodeWord
    }

    fn max_term_length(&self) -> usize {
        self.max_term_length
    }

    fn min_term_length(&self) -> usize {
        self.min_term_length
    }
}
