//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sift_common::{Result, error::Error, verify_arg};

use crate::{
    lemmatizer::{
        DictionaryLemmatizer, IdentityLemmatizer, LowercaseLemmatizer, StemmingLemmatizer,
    },
    preprocessor::Preprocessor,
    tokenizers::{DEFAULT_MAX_TERM_LENGTH, DEFAULT_MIN_TERM_LENGTH, create_tokenizer_with_lengths},
};

/// Text preprocessing and search defaults, usually read from a JSON file.
/// Every field may be omitted.
///
/// ```json
/// {
///   "tokenizer": "unicode-word",
///   "lemmatizer": "dictionary",
///   "dictionaries": ["data/en_lemmas.txt"],
///   "default_limit": 20
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Tokenizer name, see [`create_tokenizer`](crate::tokenizers::create_tokenizer).
    pub tokenizer: String,
    /// `"lowercase"`, `"identity"`, `"stemming"` or `"dictionary"` (dictionary
    /// lookup with stemming for words it does not list).
    pub lemmatizer: String,
    /// Dictionary files for the `"dictionary"` lemmatizer.
    pub dictionaries: Vec<PathBuf>,
    pub max_term_length: usize,
    pub min_term_length: usize,
    /// Result limit applied when a search does not pass one.
    pub default_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tokenizer: "unicode-word".to_string(),
            lemmatizer: "lowercase".to_string(),
            dictionaries: Vec::new(),
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
            min_term_length: DEFAULT_MIN_TERM_LENGTH,
            default_limit: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| Error::invalid_arg("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_json(&json)
    }

    /// Checks names and limits without touching the file system.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_term_length, self.max_term_length > 0);
        verify_arg!(
            min_term_length,
            self.min_term_length <= self.max_term_length
        );
        match self.lemmatizer.as_str() {
            "lowercase" | "identity" | "stemming" => (),
            "dictionary" => verify_arg!(dictionaries, !self.dictionaries.is_empty()),
            other => {
                return Err(Error::invalid_arg(
                    "lemmatizer",
                    format!("Unrecognized lemmatizer: {other}"),
                ));
            }
        }
        create_tokenizer_with_lengths(&self.tokenizer, self.max_term_length, self.min_term_length)
            .map(drop)
    }

    /// Creates the configured preprocessor, loading dictionaries if needed.
    pub fn build_preprocessor(&self) -> Result<Preprocessor> {
        self.validate()?;
        let tokenizer = create_tokenizer_with_lengths(
            &self.tokenizer,
            self.max_term_length,
            self.min_term_length,
        )?;
        let preprocessor = match self.lemmatizer.as_str() {
            "identity" => Preprocessor::new(tokenizer, IdentityLemmatizer),
            "stemming" => Preprocessor::new(tokenizer, StemmingLemmatizer),
            "dictionary" => Preprocessor::new(
                tokenizer,
                DictionaryLemmatizer::from_files(&self.dictionaries)?,
            ),
            _ => Preprocessor::new(tokenizer, LowercaseLemmatizer),
        };
        Ok(preprocessor)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tokenizer, "unicode-word");
        assert_eq!(config.lemmatizer, "lowercase");
        assert_eq!(config.max_term_length, 128);
        assert_eq!(config.default_limit, None);

        let preprocessor = config.build_preprocessor().unwrap();
        assert_eq!(preprocessor.preprocess("Hello World"), vec!["hello", "world"]);
    }

    #[test]
    fn test_invalid_values() {
        for json in [
            r#"{"tokenizer": "unicode-log"}"#,
            r#"{"lemmatizer": "snowball"}"#,
            r#"{"lemmatizer": "dictionary"}"#,
            r#"{"max_term_length": 0}"#,
            r#"{"min_term_length": 10, "max_term_length": 5}"#,
            r#"{"unknown_field": true}"#,
            r#"{"default_limit": "ten"}"#,
            "not json",
        ] {
            let err = EngineConfig::from_json(json).unwrap_err();
            assert!(
                matches!(err.kind(), sift_common::error::ErrorKind::InvalidArgument { .. }),
                "{json}: {err}"
            );
        }
    }

    #[test]
    fn test_load_with_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let dict = dir.path().join("lemmas.txt");
        writeln!(std::fs::File::create(&dict).unwrap(), "texts text").unwrap();

        let config_path = dir.path().join("config.json");
        let config = EngineConfig {
            lemmatizer: "dictionary".to_string(),
            dictionaries: vec![dict],
            default_limit: Some(3),
            ..Default::default()
        };
        std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = EngineConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
        let preprocessor = loaded.build_preprocessor().unwrap();
        assert_eq!(preprocessor.preprocess("Texts"), vec!["text"]);
        assert_eq!(preprocessor.preprocess("Cats running"), vec!["cat", "run"]);
    }

    #[test]
    fn test_stemming_lemmatizer() {
        let config = EngineConfig::from_json(r#"{"lemmatizer": "stemming"}"#).unwrap();
        let preprocessor = config.build_preprocessor().unwrap();
        assert_eq!(preprocessor.preprocess("Cats and книги"), vec!["cat", "and", "книг"]);
    }
}
