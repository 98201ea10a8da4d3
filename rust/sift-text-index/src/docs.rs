//! Document storage consumed by the [`Engine`](crate::engine::Engine).

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};
use sift_common::{Result, error::Error};

use crate::posting_list::DocId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub url: String,
    pub text: String,
}

/// Collection of documents an index is built from and results are read
/// back from.
pub trait DocumentSource: Send + Sync {
    /// Forward-only pass over all documents in ascending `DocId` order.
    fn cursor(&self) -> Box<dyn Iterator<Item = Document> + '_>;

    /// Looks up one document.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownDocument` error if no document has this id.
    fn get_document(&self, doc_id: DocId) -> Result<Document>;
}

/// One line of a JSON Lines corpus.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    url: String,
    text: String,
}

/// Documents held in memory, identified by insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Vec<Document>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a document and returns its id.
    pub fn push(&mut self, url: impl Into<String>, text: impl Into<String>) -> DocId {
        let id = self.docs.len() as DocId;
        self.docs.push(Document {
            id,
            url: url.into(),
            text: text.into(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Reads a JSON Lines corpus in which every non-blank line is an object
    /// with `url` and `text` fields. Documents get ids in line order,
    /// blank lines excluded.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::io(source.clone(), e))?;
        let store = Self::read_jsonl(BufReader::new(file), &source)?;
        log::info!("loaded {} documents from {source}", store.len());
        Ok(store)
    }

    /// Like [`load_jsonl`](Self::load_jsonl), reading from `reader`.
    /// `source` names the input in errors.
    pub fn read_jsonl<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut store = Self::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(source, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CorpusRecord = serde_json::from_str(&line)
                .map_err(|e| Error::other(format!("{source}:{}", line_no + 1), e))?;
            store.push(record.url, record.text);
        }
        Ok(store)
    }
}

impl DocumentSource for MemoryDocumentStore {
    fn cursor(&self) -> Box<dyn Iterator<Item = Document> + '_> {
        Box::new(self.docs.iter().cloned())
    }

    fn get_document(&self, doc_id: DocId) -> Result<Document> {
        self.docs
            .get(doc_id as usize)
            .cloned()
            .ok_or_else(|| Error::unknown_document(doc_id))
    }
}
