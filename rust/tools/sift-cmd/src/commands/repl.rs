//! Interactive query loop

use std::io::{BufRead, Write};

use anyhow::Result;
use sift_text_index::Engine;

use crate::{
    EngineArgs,
    commands::{execute, open_engine, write_hits},
};

pub fn run(args: EngineArgs) -> Result<()> {
    let engine = open_engine(&args)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(
        &engine,
        args.ranked,
        args.limit,
        stdin.lock(),
        &mut stdout.lock(),
    )
}

/// Answers one query per input line until end of input. Queries that fail
/// to parse are reported and the loop goes on.
fn serve<R: BufRead, W: Write>(
    engine: &Engine,
    ranked: bool,
    limit: Option<usize>,
    input: R,
    out: &mut W,
) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        if !query.is_empty() {
            match execute(engine, query, ranked, limit) {
                Ok(docs) => {
                    write_hits(out, &docs)?;
                    writeln!(out, "({} results)", docs.len())?;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use sift_text_index::{MemoryDocumentStore, Preprocessor};

    fn engine() -> Engine {
        let mut store = MemoryDocumentStore::new();
        store.push("a", "Simple text");
        store.push("b", "Very complex text");
        store.push("c", "Hello world");
        let mut engine = Engine::new(store, Preprocessor::default());
        engine.build_index().unwrap();
        engine
    }

    #[test]
    fn test_serve_boolean() {
        let engine = engine();
        let mut out = Vec::new();
        serve(
            &engine,
            false,
            None,
            Cursor::new("text & complex\n\nhello & (world\n"),
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("\"doc_id\":1,\"url\":\"b\""));
        assert!(out.contains("(1 results)"));
        assert!(out.contains("error: "));
        assert!(!out.contains("\"url\":\"a\""));
    }

    #[test]
    fn test_serve_ranked_with_limit() {
        let engine = engine();
        let mut out = Vec::new();
        serve(&engine, true, Some(1), Cursor::new("simple text\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("\"doc_id\":0"));
        assert!(out.contains("(1 results)"));
    }
}
