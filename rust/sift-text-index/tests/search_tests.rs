use sift_text_index::{
    CompressedPostingList, DocId, Engine, EngineConfig, InvertedIndex, MemoryDocumentStore,
    Preprocessor,
    lemmatizer::IdentityLemmatizer,
    query::{BoolQuery, PhraseQuery, RankedQuery},
    tokenizers::TokenizerType,
};
use tempfile::TempDir;

fn build_index(docs: &[&[&str]]) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (doc_id, terms) in docs.iter().enumerate() {
        index.add_document(doc_id as DocId, *terms);
    }
    index.build_skips();
    index
}

fn identity() -> Preprocessor {
    Preprocessor::new(TokenizerType::default(), IdentityLemmatizer)
}

fn boolean(index: &InvertedIndex, query: &str) -> Vec<DocId> {
    BoolQuery::parse(query, &identity())
        .expect("valid query")
        .search(index, None)
}

fn ranked(index: &InvertedIndex, query: &str) -> Vec<DocId> {
    RankedQuery::parse(query, &identity())
        .search(index, None)
        .expect("ranked search")
}

const RANKED_CORPUS: [&[&str]; 5] = [
    &["simple", "text"],
    &["very", "complex", "text"],
    &["another", "simple", "text"],
    &["hello", "world"],
    &["simple", "hello", "world"],
];

/// Boolean, phrase and ranked queries over the small reference corpora.
#[test]
fn test_reference_corpora() {
    let index = build_index(&[
        &["simple", "text"],
        &["very", "complex", "text"],
        &["another", "simple", "text"],
        &["hello", "world"],
    ]);
    assert_eq!(boolean(&index, "text"), vec![0, 1, 2]);
    assert_eq!(boolean(&index, "text & simple"), vec![0, 2]);
    assert_eq!(boolean(&index, "text | world"), vec![0, 1, 2, 3]);
    assert_eq!(boolean(&index, "hello | simple & text"), vec![0, 2, 3]);

    let index = build_index(&[
        &["simple", "text"],
        &["very", "complex", "text"],
        &["simple", "another", "text"],
        &["hello", "world"],
    ]);
    let phrase = |terms: &[&str]| {
        PhraseQuery::new(terms.iter().copied())
            .execute(&index)
            .doc_ids()
    };
    assert_eq!(phrase(&["simple", "text"]), vec![0]);
    assert!(phrase(&["text", "simple"]).is_empty());

    let index = build_index(&RANKED_CORPUS);
    assert_eq!(ranked(&index, "simple"), vec![0, 2, 4]);
    assert_eq!(ranked(&index, "simple text"), vec![0, 2, 1, 4]);
    assert_eq!(ranked(&index, "complex text"), vec![1, 0, 2]);
    assert_eq!(ranked(&index, "hello simple")[0], 4);
    assert_eq!(ranked(&index, "\"complex text\" another"), vec![1]);
    assert!(ranked(&index, "").is_empty());
    assert!(ranked(&index, "nonexistent").is_empty());
}

/// Queries answer the same before and after a save/load cycle.
#[test]
fn test_index_file_round_trip() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("ranked.idx");

    let index = build_index(&RANKED_CORPUS);
    let written = index.save(&path).expect("save");
    assert_eq!(written, std::fs::metadata(&path).expect("metadata").len());

    let loaded = InvertedIndex::load(&path).expect("load");
    assert_eq!(loaded.doc_count(), 5);
    for query in ["simple", "simple text", "complex text", "\"complex text\" another"] {
        assert_eq!(ranked(&loaded, query), ranked(&index, query), "{query}");
    }
    for query in ["text", "hello | simple & text", "(hello | very) & world"] {
        assert_eq!(boolean(&loaded, query), boolean(&index, query), "{query}");
    }
}

/// Loading rejects damaged files instead of returning a partial index.
#[test]
fn test_corrupt_index_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("index.idx");
    build_index(&RANKED_CORPUS).save(&path).expect("save");
    let bytes = std::fs::read(&path).expect("read");

    std::fs::write(&path, &bytes[..bytes.len() - 3]).expect("write");
    assert!(InvertedIndex::load(&path).unwrap_err().is_corrupt_index());

    // First term length points far past the end of the file.
    let mut damaged = bytes.clone();
    damaged[8..16].copy_from_slice(&u64::MAX.to_le_bytes());
    std::fs::write(&path, &damaged).expect("write");
    assert!(InvertedIndex::load(&path).unwrap_err().is_corrupt_index());

    // Term count larger than the number of stored terms.
    let mut damaged = bytes;
    damaged[0] += 1;
    std::fs::write(&path, &damaged).expect("write");
    assert!(InvertedIndex::load(&path).unwrap_err().is_corrupt_index());
}

/// A larger random corpus: boolean results agree with a naive evaluation
/// and phrase hits agree with a scan of the token sequences.
#[test]
fn test_random_corpus_against_naive_evaluation() {
    let vocabulary = ["alpha", "beta", "gamma", "delta", "omega"];
    let mut rng = fastrand::Rng::with_seed(2024);
    let docs: Vec<Vec<&str>> = (0..400)
        .map(|_| {
            let len = rng.usize(0..12);
            (0..len).map(|_| vocabulary[rng.usize(..vocabulary.len())]).collect()
        })
        .collect();
    let refs: Vec<&[&str]> = docs.iter().map(Vec::as_slice).collect();
    let index = build_index(&refs);

    let has = |doc: &[&str], term: &str| doc.contains(&term);
    let expected: Vec<DocId> = (0..docs.len() as DocId)
        .filter(|&d| {
            let doc = refs[d as usize];
            has(doc, "alpha") || (has(doc, "beta") && has(doc, "gamma"))
        })
        .collect();
    assert_eq!(boolean(&index, "alpha or beta and gamma"), expected);

    let expected: Vec<DocId> = (0..docs.len() as DocId)
        .filter(|&d| {
            let doc = refs[d as usize];
            (has(doc, "alpha") || has(doc, "beta")) && has(doc, "omega")
        })
        .collect();
    assert_eq!(boolean(&index, "(alpha | beta) & omega"), expected);

    for phrase in [
        vec!["alpha", "beta"],
        vec!["gamma", "gamma"],
        vec!["delta", "omega", "alpha"],
    ] {
        let expected: Vec<DocId> = (0..docs.len() as DocId)
            .filter(|&d| refs[d as usize].windows(phrase.len()).any(|w| w == phrase.as_slice()))
            .collect();
        let actual = PhraseQuery::new(phrase.iter().copied()).execute(&index).doc_ids();
        assert_eq!(actual, expected, "{phrase:?}");
    }

    // Every ranked hit contains at least one query term.
    let hits = ranked(&index, "alpha omega");
    assert!(!hits.is_empty());
    for doc_id in hits {
        let doc = refs[doc_id as usize];
        assert!(has(doc, "alpha") || has(doc, "omega"));
    }
}

/// The engine facade from a JSON Lines corpus to materialized documents.
#[test]
fn test_engine_end_to_end() {
    let temp_dir = TempDir::new().expect("temp dir");
    let corpus_path = temp_dir.path().join("corpus.jsonl");
    std::fs::write(
        &corpus_path,
        concat!(
            r#"{"url": "https://a", "text": "Simple text."}"#,
            "\n",
            r#"{"url": "https://b", "text": "Very complex TEXT"}"#,
            "\n",
            r#"{"url": "https://c", "text": "Another simple text"}"#,
            "\n",
            r#"{"url": "https://d", "text": "Hello, world!"}"#,
            "\n",
            r#"{"url": "https://e", "text": "Simple: hello world"}"#,
            "\n",
        ),
    )
    .expect("write corpus");

    let config = EngineConfig::from_json(r#"{"default_limit": 2}"#).expect("config");
    let store = MemoryDocumentStore::load_jsonl(&corpus_path).expect("corpus");
    let mut engine = Engine::from_config(store, &config).expect("engine");
    engine.build_index().expect("build");

    let docs = engine.search_ranked("Simple TEXT", None).expect("ranked");
    let urls: Vec<&str> = docs.iter().map(|doc| doc.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a", "https://c"]);

    assert_eq!(
        engine.search_boolean_ids("hello и world", Some(10)).expect("boolean"),
        vec![3, 4]
    );
    assert!(engine.search_boolean("hello & (world", None).unwrap_err().is_parse());

    let index_path = temp_dir.path().join("corpus.idx");
    engine.save_index(&index_path).expect("save");

    let store = MemoryDocumentStore::load_jsonl(&corpus_path).expect("corpus");
    let mut reloaded = Engine::new(store, Preprocessor::default());
    reloaded.load_index(&index_path).expect("load");
    assert_eq!(
        reloaded.search_ranked_ids("simple text", None).expect("ranked"),
        vec![0, 2, 1, 4]
    );
}

#[test]
fn test_set_operations_keep_order() {
    let mut left = CompressedPostingList::new();
    let mut right = CompressedPostingList::new();
    for doc_id in (0..1000).step_by(3) {
        left.add(doc_id, &[0]);
    }
    for doc_id in (0..1000).step_by(5) {
        right.add(doc_id, &[1, 2]);
    }
    left.build_skips();
    right.build_skips();

    let both = left.intersect(&right).doc_ids();
    assert_eq!(both, (0..1000).step_by(15).collect::<Vec<DocId>>());
    assert_eq!(right.intersect(&left).doc_ids(), both);

    let either = left.merge(&right).doc_ids();
    assert!(either.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(either.len(), 334 + 200 - 67);
}
