//! Search command implementation

use anyhow::Result;

use crate::{
    EngineArgs,
    commands::{execute, open_engine, write_hits},
};

pub fn run(args: EngineArgs, query: String) -> Result<()> {
    let engine = open_engine(&args)?;
    let docs = execute(&engine, &query, args.ranked, args.limit)?;
    write_hits(&mut std::io::stdout().lock(), &docs)
}
