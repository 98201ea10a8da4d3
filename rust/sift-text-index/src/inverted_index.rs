//! In-memory inverted index: term to posting list, plus document lengths.

use ahash::AHashMap;
use sift_common::{Result, error::Error};

use crate::posting_list::{CompressedPostingList, DocId};

/// Mapping from term to its [`CompressedPostingList`], together with the
/// token count of every indexed document.
///
/// The index is built in a single pass: [`add_document`](Self::add_document)
/// once per document in increasing `DocId` order, then
/// [`build_skips`](Self::build_skips). From then on it is only read, and a
/// shared reference can be used by any number of concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    pub(crate) terms: AHashMap<String, CompressedPostingList>,
    pub(crate) doc_lengths: Vec<u32>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Default::default()
    }

    /// Indexes one document given as its sequence of preprocessed terms.
    ///
    /// Each distinct term gets one posting holding the zero-based positions at
    /// which it occurs. The document length is the total number of terms.
    ///
    /// `doc_id` must be greater than every previously added id; posting lists
    /// rely on this for their gap encoding.
    pub fn add_document<S: AsRef<str>>(&mut self, doc_id: DocId, terms: &[S]) {
        let idx = doc_id as usize;
        if self.doc_lengths.len() <= idx {
            self.doc_lengths.resize(idx + 1, 0);
        }
        self.doc_lengths[idx] = terms.len() as u32;

        let mut term_coords: AHashMap<&str, Vec<u32>> = AHashMap::new();
        for (pos, term) in terms.iter().enumerate() {
            term_coords
                .entry(term.as_ref())
                .or_default()
                .push(pos as u32);
        }

        for (term, coords) in term_coords {
            match self.terms.get_mut(term) {
                Some(list) => list.add(doc_id, &coords),
                None => {
                    let mut list = CompressedPostingList::new();
                    list.add(doc_id, &coords);
                    self.terms.insert(term.to_string(), list);
                }
            }
        }
    }

    /// Builds the skip table of every posting list.
    pub fn build_skips(&mut self) {
        for list in self.terms.values_mut() {
            list.build_skips();
        }
    }

    /// Posting list of `term`, or `None` if the term never occurred.
    ///
    /// An absent term behaves exactly like an empty posting list; it is not
    /// an error.
    pub fn get_postings(&self, term: &str) -> Option<&CompressedPostingList> {
        self.terms.get(term)
    }

    /// Number of terms (tokens) of the document.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownDocument` error if `doc_id` was never indexed.
    pub fn get_doc_length(&self, doc_id: DocId) -> Result<u32> {
        self.doc_lengths
            .get(doc_id as usize)
            .copied()
            .ok_or_else(|| Error::unknown_document(doc_id))
    }

    /// Number of documents covered by the index.
    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// All indexed terms, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Token counts of all documents, indexed by `DocId`.
    pub fn doc_lengths(&self) -> &[u32] {
        &self.doc_lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting_list::Posting;

    fn build(docs: &[&[&str]]) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for (doc_id, terms) in docs.iter().enumerate() {
            index.add_document(doc_id as DocId, *terms);
        }
        index.build_skips();
        index
    }

    #[test]
    fn test_add_documents() {
        let index = build(&[
            &["simple", "text"],
            &["very", "complex", "text"],
            &["text", "and", "more", "text"],
        ]);

        assert_eq!(index.doc_count(), 3);
        assert_eq!(index.term_count(), 6);
        assert_eq!(index.get_doc_length(0).unwrap(), 2);
        assert_eq!(index.get_doc_length(2).unwrap(), 4);

        let text = index.get_postings("text").unwrap();
        assert_eq!(
            text.decompress(),
            vec![
                Posting { doc_id: 0, term_frequency: 1 },
                Posting { doc_id: 1, term_frequency: 1 },
                Posting { doc_id: 2, term_frequency: 2 },
            ]
        );
        let mut cursor = text.cursor();
        cursor.skip_to(2);
        assert_eq!(cursor.coords().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_missing_term_and_document() {
        let index = build(&[&["hello", "world"]]);
        assert!(index.get_postings("absent").is_none());
        assert!(index.get_doc_length(0).is_ok());
        let err = index.get_doc_length(1).unwrap_err();
        assert!(matches!(
            err.kind(),
            sift_common::error::ErrorKind::UnknownDocument { doc_id: 1 }
        ));
    }

    #[test]
    fn test_sparse_doc_ids_and_empty_documents() {
        let mut index = InvertedIndex::new();
        index.add_document::<&str>(0, &[]);
        index.add_document(3, &["word"]);
        index.build_skips();

        assert_eq!(index.doc_count(), 4);
        assert_eq!(index.get_doc_length(0).unwrap(), 0);
        assert_eq!(index.get_doc_length(2).unwrap(), 0);
        assert_eq!(index.get_postings("word").unwrap().doc_ids(), vec![3]);
    }

    #[test]
    fn test_index_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InvertedIndex>();
    }
}
