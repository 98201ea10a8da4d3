//! TF-IDF cosine ranking.
//!
//! For a query term with `tf_q` occurrences in the query and a posting list
//! of `df` documents in an index of `N` documents:
//!
//! ```text
//! idf = ln((1 + N) / (1 + df)) + 1
//! w_q = (1 + ln tf_q) * idf
//! w_d = (1 + ln tf_d) * idf          for each posting (d, tf_d)
//! score(d) = sum(w_d * w_q) / (sqrt(len(d)) * sqrt(sum(w_q^2)))
//! ```
//!
//! Double-quoted spans of the query are phrases. When a query has phrases,
//! only documents containing every phrase are scored, and `df` is counted
//! within that restricted set.

use std::collections::BTreeMap;

use ahash::AHashMap;
use sift_common::Result;

use super::phrase::PhraseQuery;
use crate::{
    inverted_index::InvertedIndex,
    posting_list::{CompressedPostingList, DocId},
    preprocessor::Preprocessor,
};

/// A ranked document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// A parsed free-text query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedQuery {
    /// Query term counts. Sorted, so that scores accumulate in the same
    /// order on every run.
    term_counts: BTreeMap<String, u32>,
    phrases: Vec<PhraseQuery>,
}

impl RankedQuery {
    /// Builds a query from its preprocessed terms and phrases.
    pub fn new<S: Into<String>>(
        terms: impl IntoIterator<Item = S>,
        phrases: impl IntoIterator<Item = PhraseQuery>,
    ) -> Self {
        let mut term_counts = BTreeMap::new();
        for term in terms {
            *term_counts.entry(term.into()).or_insert(0) += 1;
        }
        RankedQuery {
            term_counts,
            phrases: phrases
                .into_iter()
                .filter(|phrase| !phrase.terms().is_empty())
                .collect(),
        }
    }

    /// Parses free text.
    ///
    /// Every double-quoted span becomes a phrase, preprocessed on its own; a
    /// quote left open runs to the end of the query. The term counts come
    /// from preprocessing the whole query, so words inside phrases count as
    /// ordinary terms as well. The quote characters themselves never become
    /// terms since the tokenizer treats them as separators.
    pub fn parse(query: &str, preprocessor: &Preprocessor) -> Self {
        let phrases = quoted_spans(query)
            .into_iter()
            .map(|span| PhraseQuery::parse(span, preprocessor));
        let parsed = RankedQuery::new(preprocessor.preprocess(query), phrases);
        log::debug!(
            "ranked query {query:?}: {} distinct terms, {} phrases",
            parsed.term_counts.len(),
            parsed.phrases.len()
        );
        parsed
    }

    /// Distinct query terms with their counts, sorted by term.
    pub fn term_counts(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_counts
            .iter()
            .map(|(term, &count)| (term.as_str(), count))
    }

    pub fn phrases(&self) -> &[PhraseQuery] {
        &self.phrases
    }

    /// Scores every candidate document, best first; ties are broken by
    /// ascending `DocId`.
    ///
    /// Returns an empty list when the query has no terms.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownDocument` error if a posting refers to a document
    /// without a recorded length.
    pub fn execute_scored(&self, index: &InvertedIndex) -> Result<Vec<ScoredDoc>> {
        let phrase_docs = self.phrase_docs(index);
        let doc_count = index.doc_count() as f64;

        let mut scores: AHashMap<DocId, f64> = AHashMap::new();
        let mut query_norm = 0.0f64;
        for (term, &tf_q) in &self.term_counts {
            let restricted;
            let list = match (index.get_postings(term), &phrase_docs) {
                (Some(list), Some(allowed)) => {
                    restricted = list.retain_docs(allowed);
                    Some(&restricted)
                }
                (list, _) => list,
            };
            let df = list.map_or(0, CompressedPostingList::len) as f64;

            let idf = ((1.0 + doc_count) / (1.0 + df)).ln() + 1.0;
            let w_q = (1.0 + f64::from(tf_q).ln()) * idf;
            query_norm += w_q * w_q;

            for posting in list.into_iter().flatten() {
                let w_d = (1.0 + f64::from(posting.term_frequency).ln()) * idf;
                *scores.entry(posting.doc_id).or_insert(0.0) += w_d * w_q;
            }
        }

        let query_norm = query_norm.sqrt();
        if query_norm == 0.0 {
            return Ok(Vec::new());
        }

        let mut ranked = Vec::with_capacity(scores.len());
        for (doc_id, score) in scores {
            let doc_length = index.get_doc_length(doc_id)?;
            if doc_length == 0 {
                continue;
            }
            let doc_norm = f64::from(doc_length).sqrt();
            ranked.push(ScoredDoc {
                doc_id,
                score: score / (doc_norm * query_norm),
            });
        }
        ranked.sort_unstable_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        log::debug!("ranked query scored {} documents", ranked.len());
        Ok(ranked)
    }

    /// Best matching documents, at most `limit` of them.
    pub fn search(&self, index: &InvertedIndex, limit: Option<usize>) -> Result<Vec<DocId>> {
        let mut ranked = self.execute_scored(index)?;
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked.into_iter().map(|doc| doc.doc_id).collect())
    }

    /// Documents containing every phrase, or `None` for a query without
    /// phrases.
    fn phrase_docs(&self, index: &InvertedIndex) -> Option<CompressedPostingList> {
        self.phrases
            .iter()
            .map(|phrase| phrase.execute(index))
            .reduce(|acc, docs| acc.intersect(&docs))
    }
}

/// Contents of the double-quoted spans of `query`.
fn quoted_spans(query: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut rest = query;
    while let Some(open) = rest.find('"') {
        let inner = &rest[open + 1..];
        match inner.find('"') {
            Some(close) => {
                spans.push(&inner[..close]);
                rest = &inner[close + 1..];
            }
            None => {
                spans.push(inner);
                break;
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InvertedIndex {
        let docs: [&[&str]; 5] = [
            &["simple", "text"],
            &["very", "complex", "text"],
            &["another", "simple", "text"],
            &["hello", "world"],
            &["simple", "hello", "world"],
        ];
        let mut index = InvertedIndex::new();
        for (doc_id, terms) in docs.iter().enumerate() {
            index.add_document(doc_id as DocId, *terms);
        }
        index.build_skips();
        index
    }

    fn search(query: &str) -> Vec<DocId> {
        RankedQuery::parse(query, &Preprocessor::default())
            .search(&index(), None)
            .unwrap()
    }

    #[test]
    fn test_quoted_spans() {
        assert_eq!(quoted_spans("plain words"), Vec::<&str>::new());
        assert_eq!(quoted_spans("\"a b\" c \"d\""), vec!["a b", "d"]);
        assert_eq!(quoted_spans("x \"open ended"), vec!["open ended"]);
        assert_eq!(quoted_spans("\"\""), vec![""]);
    }

    #[test]
    fn test_parse() {
        let query = RankedQuery::parse("Simple \"complex TEXT\" text \"\"", &Preprocessor::default());
        assert_eq!(
            query.term_counts().collect::<Vec<_>>(),
            vec![("complex", 1), ("simple", 1), ("text", 2)]
        );
        assert_eq!(query.phrases().len(), 1);
        assert_eq!(query.phrases()[0].terms(), ["complex", "text"]);
    }

    #[test]
    fn test_rankings() {
        assert_eq!(search("simple"), vec![0, 2, 4]);
        assert_eq!(search("simple text"), vec![0, 2, 1, 4]);
        assert_eq!(search("complex text"), vec![1, 0, 2]);
        assert_eq!(search("hello simple")[0], 4);
        assert_eq!(search("\"complex text\" another"), vec![1]);
    }

    #[test]
    fn test_empty_results() {
        assert!(search("").is_empty());
        assert!(search("   ...  ").is_empty());
        assert!(search("nonexistent").is_empty());
        assert!(search("\"text simple\"").is_empty());
    }

    #[test]
    fn test_scores() {
        let index = index();
        let scored = RankedQuery::new(["simple"], [])
            .execute_scored(&index)
            .unwrap();
        assert_eq!(scored.len(), 3);
        // Equal term frequency and length give equal scores.
        assert_eq!(scored[1].score, scored[2].score);
        assert!(scored[0].score > scored[1].score);

        // idf(simple) = ln(6/4) + 1, doc 0 has length 2.
        let idf = (6.0f64 / 4.0).ln() + 1.0;
        let expected = idf * idf / (2.0f64.sqrt() * idf);
        assert!((scored[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_terms_and_limit() {
        let mut index = InvertedIndex::new();
        index.add_document(0, &["rust", "rust", "rust", "code"]);
        index.add_document(1, &["rust", "code", "more", "code"]);
        index.add_document::<&str>(2, &[]);
        index.add_document(3, &["other"]);
        index.build_skips();

        let query = RankedQuery::new(["rust", "rust"], []);
        assert_eq!(query.search(&index, None).unwrap(), vec![0, 1]);
        assert_eq!(query.search(&index, Some(1)).unwrap(), vec![0]);
        assert!(query.search(&index, Some(0)).unwrap().is_empty());

        let query = RankedQuery::new(["code"], []);
        assert_eq!(query.search(&index, None).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_phrase_restricts_candidates() {
        let index = index();
        let query = RankedQuery::parse("\"simple text\" hello", &Preprocessor::default());
        // Docs 0 and 2 contain the phrase; "hello" only occurs elsewhere.
        assert_eq!(query.search(&index, None).unwrap(), vec![0, 2]);

        let query = RankedQuery::new(
            ["text"],
            [
                PhraseQuery::new(["simple"]),
                PhraseQuery::new(["text"]),
                PhraseQuery::new(Vec::<String>::new()),
            ],
        );
        assert_eq!(query.phrases().len(), 2);
        assert_eq!(query.search(&index, None).unwrap(), vec![0, 2]);
    }
}
