//! Term normalization applied after tokenization.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use sift_common::{Result, error::Error};

/// Maps a token to the form under which it is indexed and searched.
///
/// Any `Fn(&str) -> String` closure is a lemmatizer too.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

impl<F> Lemmatizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn lemmatize(&self, word: &str) -> String {
        self(word)
    }
}

/// Leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Lowercases tokens and folds `ё` into `е`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        normalize(word)
    }
}

/// Unicode lowercase followed by `ё` → `е`.
pub fn normalize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.contains('ё') {
        lower.replace('ё', "е")
    } else {
        lower
    }
}

/// Snowball stem of an already normalized word: English for words starting
/// with a Latin letter, Russian otherwise.
pub fn stem(word: &str) -> String {
    let algorithm = match word.chars().next() {
        None => return String::new(),
        Some(first) if first.is_ascii_alphabetic() => Algorithm::English,
        Some(_) => Algorithm::Russian,
    };
    Stemmer::create(algorithm).stem(word).into_owned()
}

/// Normalizes and stems tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct StemmingLemmatizer;

impl Lemmatizer for StemmingLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        stem(&normalize(word))
    }
}

/// Dictionary-driven lemmatizer.
///
/// Dictionaries are plain text files with one `word lemma` pair per line,
/// separated by whitespace. Both columns are normalized on load. Lookups
/// normalize the token first; a token missing from every dictionary falls
/// back to its [`stem`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    lemmas: AHashMap<String, String>,
}

impl DictionaryLemmatizer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads every dictionary in `paths`. Later files override earlier ones
    /// for words they share.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut lemmatizer = Self::new();
        for path in paths {
            lemmatizer.load_file(path)?;
        }
        Ok(lemmatizer)
    }

    /// Adds the entries of one dictionary file.
    ///
    /// # Returns
    ///
    /// The number of entries read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::io(source.clone(), e))?;
        let count = self.load_reader(BufReader::new(file), &source)?;
        log::info!("loaded {count} lemmas from {source}");
        Ok(count)
    }

    /// Adds the entries read from `reader`. `source` names the input in
    /// warnings and errors.
    ///
    /// Blank lines are skipped. Lines with a single column are skipped with
    /// a warning; columns past the second are ignored.
    pub fn load_reader<R: BufRead>(&mut self, reader: R, source: &str) -> Result<usize> {
        let mut count = 0;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(source, e))?;
            let mut columns = line.split_whitespace();
            match (columns.next(), columns.next()) {
                (Some(word), Some(lemma)) => {
                    self.insert(word, lemma);
                    count += 1;
                }
                (Some(_), None) => {
                    log::warn!("{source}:{}: expected 'word lemma', skipping", line_no + 1);
                }
                _ => (),
            }
        }
        Ok(count)
    }

    pub fn insert(&mut self, word: &str, lemma: &str) {
        self.lemmas.insert(normalize(word), normalize(lemma));
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let normalized = normalize(word);
        match self.lemmas.get(&normalized) {
            Some(lemma) => lemma.clone(),
            None => stem(&normalized),
        }
    }
}
