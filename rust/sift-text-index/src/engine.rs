//! Search engine facade tying documents, preprocessing and the index together.

use std::{path::Path, time::Instant};

use sift_common::{Result, verify_arg};

use crate::{
    config::EngineConfig,
    docs::{Document, DocumentSource},
    inverted_index::InvertedIndex,
    posting_list::DocId,
    preprocessor::Preprocessor,
    query::{BoolQuery, RankedQuery},
};

/// Owns a document source, the preprocessor shared by indexing and
/// querying, and the inverted index.
///
/// The index is empty until [`build_index`](Self::build_index) or
/// [`load_index`](Self::load_index) is called. Searches take `&self`, so a
/// built engine can serve queries from several threads.
pub struct Engine {
    source: Box<dyn DocumentSource>,
    preprocessor: Preprocessor,
    index: InvertedIndex,
    default_limit: Option<usize>,
}

impl Engine {
    pub fn new(source: impl DocumentSource + 'static, preprocessor: Preprocessor) -> Self {
        Engine {
            source: Box::new(source),
            preprocessor,
            index: InvertedIndex::new(),
            default_limit: None,
        }
    }

    /// Creates an engine with the preprocessor and defaults of `config`.
    pub fn from_config(
        source: impl DocumentSource + 'static,
        config: &EngineConfig,
    ) -> Result<Self> {
        let mut engine = Engine::new(source, config.build_preprocessor()?);
        engine.default_limit = config.default_limit;
        Ok(engine)
    }

    /// Indexes every document of the source in one pass, replacing the
    /// current index.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the source yields document ids
    /// out of ascending order. The current index is kept in that case.
    pub fn build_index(&mut self) -> Result<()> {
        let started = Instant::now();
        let mut index = InvertedIndex::new();
        let mut last: Option<DocId> = None;
        for doc in self.source.cursor() {
            verify_arg!(doc_id, last.is_none_or(|last| doc.id > last));
            let terms = self.preprocessor.preprocess(&doc.text);
            index.add_document(doc.id, &terms);
            last = Some(doc.id);
        }
        index.build_skips();

        log::info!(
            "indexed {} documents, {} terms in {:?}",
            index.doc_count(),
            index.term_count(),
            started.elapsed()
        );
        self.index = index;
        Ok(())
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Replaces the index, e.g. with one built elsewhere. Skip tables must
    /// already be built.
    pub fn set_index(&mut self, index: InvertedIndex) {
        self.index = index;
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn source(&self) -> &dyn DocumentSource {
        self.source.as_ref()
    }

    pub fn default_limit(&self) -> Option<usize> {
        self.default_limit
    }

    pub fn set_default_limit(&mut self, limit: Option<usize>) {
        self.default_limit = limit;
    }

    pub fn save_index(&self, path: impl AsRef<Path>) -> Result<u64> {
        self.index.save(path)
    }

    pub fn load_index(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.index = InvertedIndex::load(path)?;
        Ok(())
    }

    /// Ids of documents matching a boolean query, ascending. `None` falls
    /// back to the configured default limit.
    pub fn search_boolean_ids(&self, query: &str, limit: Option<usize>) -> Result<Vec<DocId>> {
        let query = BoolQuery::parse(query, &self.preprocessor)?;
        Ok(query.search(&self.index, limit.or(self.default_limit)))
    }

    /// Ids of documents ranked for a free-text query, best first.
    pub fn search_ranked_ids(&self, query: &str, limit: Option<usize>) -> Result<Vec<DocId>> {
        RankedQuery::parse(query, &self.preprocessor)
            .search(&self.index, limit.or(self.default_limit))
    }

    pub fn search_boolean(&self, query: &str, limit: Option<usize>) -> Result<Vec<Document>> {
        let ids = self.search_boolean_ids(query, limit)?;
        self.documents(&ids)
    }

    pub fn search_ranked(&self, query: &str, limit: Option<usize>) -> Result<Vec<Document>> {
        let ids = self.search_ranked_ids(query, limit)?;
        self.documents(&ids)
    }

    fn documents(&self, ids: &[DocId]) -> Result<Vec<Document>> {
        ids.iter()
            .map(|&doc_id| self.source.get_document(doc_id))
            .collect()
    }
}
