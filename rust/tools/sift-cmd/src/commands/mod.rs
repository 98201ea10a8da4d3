//! Command implementations for sift-cmd

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use sift_text_index::{Document, Engine, EngineConfig, MemoryDocumentStore, posting_list::DocId};

use crate::EngineArgs;

pub mod index;
pub mod repl;
pub mod search;

/// Longest text snippet printed for a match, in characters.
const SNIPPET_CHARS: usize = 500;

/// One printed search result.
#[derive(Serialize)]
struct Hit<'a> {
    doc_id: DocId,
    url: &'a str,
    snippet: &'a str,
}

pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {path}")),
        None => Ok(EngineConfig::default()),
    }
}

/// Creates an engine over the corpus, either loading the index file or
/// indexing the corpus in memory.
pub fn open_engine(args: &EngineArgs) -> Result<Engine> {
    let config = load_config(args.config.as_deref())?;
    let store = MemoryDocumentStore::load_jsonl(&args.corpus)
        .with_context(|| format!("Failed to read corpus: {}", args.corpus))?;
    let mut engine = Engine::from_config(store, &config)?;
    match &args.index {
        Some(index) => engine
            .load_index(index)
            .with_context(|| format!("Failed to load index: {index}"))?,
        None => engine.build_index().with_context(|| "Failed to build index")?,
    }
    Ok(engine)
}

/// Runs one query against the engine.
pub fn execute(
    engine: &Engine,
    query: &str,
    ranked: bool,
    limit: Option<usize>,
) -> Result<Vec<Document>> {
    let docs = if ranked {
        engine.search_ranked(query, limit)?
    } else {
        engine.search_boolean(query, limit)?
    };
    Ok(docs)
}

/// Prints each document as one JSON object per line.
pub fn write_hits<W: Write>(out: &mut W, docs: &[Document]) -> Result<()> {
    for doc in docs {
        let hit = Hit {
            doc_id: doc.id,
            url: &doc.url,
            snippet: snippet(&doc.text),
        };
        serde_json::to_writer(&mut *out, &hit)?;
        writeln!(out)?;
    }
    Ok(())
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("short"), "short");
        let long = "ж".repeat(600);
        assert_eq!(snippet(&long).chars().count(), SNIPPET_CHARS);
        let exact = "a".repeat(SNIPPET_CHARS);
        assert_eq!(snippet(&exact), exact);
    }

    #[test]
    fn test_write_hits() {
        let docs = vec![Document {
            id: 3,
            url: "https://example.com".to_string(),
            text: "hello \"world\"".to_string(),
        }];
        let mut out = Vec::new();
        write_hits(&mut out, &docs).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line,
            "{\"doc_id\":3,\"url\":\"https://example.com\",\"snippet\":\"hello \\\"world\\\"\"}\n"
        );
    }
}
