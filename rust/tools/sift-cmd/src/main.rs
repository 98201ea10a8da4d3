use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sift-cmd")]
#[command(about = "Build and query Sift full-text indexes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a JSON Lines corpus and write it to a file
    Index {
        /// Corpus file, one {"url": ..., "text": ...} object per line
        #[arg(long)]
        corpus: String,

        /// Output index file
        #[arg(short, long)]
        output: String,

        /// JSON engine configuration
        #[arg(long)]
        config: Option<String>,
    },

    /// Run a single query and print the matches as JSON lines
    Search {
        #[command(flatten)]
        engine: EngineArgs,

        /// Query text
        query: String,
    },

    /// Read queries from stdin and print the matches of each
    Repl {
        #[command(flatten)]
        engine: EngineArgs,
    },
}

/// Options shared by the commands that answer queries.
#[derive(Args)]
pub struct EngineArgs {
    /// Corpus file, one {"url": ..., "text": ...} object per line
    #[arg(long)]
    pub corpus: String,

    /// Prebuilt index file; the corpus is indexed in memory if omitted
    #[arg(long)]
    pub index: Option<String>,

    /// Rank by TF-IDF instead of evaluating a boolean query
    #[arg(long)]
    pub ranked: bool,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// JSON engine configuration
    #[arg(long)]
    pub config: Option<String>,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            corpus,
            output,
            config,
        } => commands::index::run(corpus, output, config),
        Commands::Search { engine, query } => commands::search::run(engine, query),
        Commands::Repl { engine } => commands::repl::run(engine),
    }
}
