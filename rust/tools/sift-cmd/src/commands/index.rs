//! Index command implementation

use anyhow::{Context, Result};
use sift_text_index::{Engine, MemoryDocumentStore};

use crate::commands::load_config;

pub fn run(corpus: String, output: String, config: Option<String>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let store = MemoryDocumentStore::load_jsonl(&corpus)
        .with_context(|| format!("Failed to read corpus: {corpus}"))?;
    let mut engine = Engine::from_config(store, &config)?;
    engine
        .build_index()
        .with_context(|| "Failed to build index")?;
    let bytes = engine
        .save_index(&output)
        .with_context(|| format!("Failed to write index: {output}"))?;

    println!(
        "Indexed {} documents, {} terms into {output} ({bytes} bytes)",
        engine.index().doc_count(),
        engine.index().term_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_text_index::InvertedIndex;

    #[test]
    fn test_index_command_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.jsonl");
        std::fs::write(
            &corpus,
            "{\"url\": \"a\", \"text\": \"simple text\"}\n{\"url\": \"b\", \"text\": \"hello world\"}\n",
        )
        .unwrap();
        let output = dir.path().join("corpus.idx");

        run(
            corpus.display().to_string(),
            output.display().to_string(),
            None,
        )
        .unwrap();

        let index = InvertedIndex::load(&output).unwrap();
        assert_eq!(index.doc_count(), 2);
        assert_eq!(index.get_postings("hello").unwrap().doc_ids(), vec![1]);
    }

    #[test]
    fn test_missing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            dir.path().join("none.jsonl").display().to_string(),
            dir.path().join("out.idx").display().to_string(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read corpus"));
    }
}
