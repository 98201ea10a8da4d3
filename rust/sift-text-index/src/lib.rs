//! Inverted text index and query engine.
//!
//! # Overview
//!
//! Documents are preprocessed into terms (tokenization, then
//! lemmatization) and indexed in an [`InvertedIndex`], which maps every term
//! to a [`CompressedPostingList`]: the documents containing the term together
//! with the term's positions, VByte-compressed, with a sparse skip table for
//! fast forward seeks.
//!
//! Three query evaluators run against a built index:
//!
//! - boolean AND / OR queries with parentheses ([`query::BoolQuery`]),
//! - exact phrases ([`query::PhraseQuery`]),
//! - TF-IDF cosine ranked free text with optional quoted phrases
//!   ([`query::RankedQuery`]).
//!
//! An index is built in one pass and read-only afterwards. It can be written
//! to and loaded from a file (see [`InvertedIndex::save`]).
//!
//! # Quick Start
//!
//! ```rust
//! use sift_text_index::{Engine, MemoryDocumentStore, Preprocessor};
//!
//! let mut store = MemoryDocumentStore::new();
//! store.push("https://example.com/1", "Simple text");
//! store.push("https://example.com/2", "Very complex text");
//!
//! let mut engine = Engine::new(store, Preprocessor::default());
//! engine.build_index().unwrap();
//!
//! let ids = engine.search_boolean_ids("text & complex", None).unwrap();
//! assert_eq!(ids, vec![1]);
//! let ranked = engine.search_ranked_ids("simple text", None).unwrap();
//! assert_eq!(ranked, vec![0, 1]);
//! ```

pub mod config;
pub mod docs;
pub mod engine;
pub mod inverted_index;
pub mod lemmatizer;
mod persist;
pub mod posting_list;
pub mod preprocessor;
pub mod query;
pub mod tokenizers;
pub mod vbyte;

pub use config::EngineConfig;
pub use docs::{Document, DocumentSource, MemoryDocumentStore};
pub use engine::Engine;
pub use inverted_index::InvertedIndex;
pub use lemmatizer::Lemmatizer;
pub use posting_list::{CompressedPostingList, DocId, Posting};
pub use preprocessor::Preprocessor;
pub use tokenizers::{Tokenizer, create_tokenizer};
