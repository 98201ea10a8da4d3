//! Query parsing and evaluation against an [`InvertedIndex`](crate::InvertedIndex).
//!
//! Three kinds of queries are supported:
//!
//! - [`BoolQuery`]: terms combined with AND / OR and parentheses. Results are
//!   in ascending `DocId` order.
//! - [`PhraseQuery`]: terms that must appear at consecutive positions.
//! - [`RankedQuery`]: free text with optional quoted phrases, ranked by
//!   TF-IDF cosine similarity.

pub mod ast;
pub mod boolean;
pub mod parser;
pub mod phrase;
pub mod ranked;

pub use ast::QueryNode;
pub use boolean::BoolQuery;
pub use parser::{Operator, parse_query};
pub use phrase::PhraseQuery;
pub use ranked::{RankedQuery, ScoredDoc};
