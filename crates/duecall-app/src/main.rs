//! Duecall application binary - composition root.
//!
//! Ties the Duecall crates together into a single executable with two
//! commands:
//! 1. `index` — offline: chunk the knowledge directory, embed the chunks,
//!    and persist the flat index plus aligned chunk metadata.
//! 2. `call` — online: load the customer records, the call script, and the
//!    persisted index, then drive an interactive reminder call on stdin.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use duecall_core::config::DuecallConfig;
use duecall_core::{CallScript, CustomerStore};
use duecall_dialog::{
    Classifier, DialogEngine, DynAnswerService, ExtractiveAnswerService, KeywordClassifier,
    MockAnswerService, Session,
};
use duecall_kb::{BuildOutcome, IndexPipeline, KnowledgeSearch, MockEmbedding};

mod cli;
use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = DuecallConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Duecall v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    match args.command {
        Command::Index { kb_dir, out_dir } => {
            let kb_dir = kb_dir.unwrap_or_else(|| PathBuf::from(&config.knowledge.kb_dir));
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.knowledge.index_dir));
            run_index(&config, &kb_dir, &out_dir).await
        }
        Command::Call => run_call(&config).await,
    }
}

/// Build the knowledge index from the corpus directory.
async fn run_index(
    config: &DuecallConfig,
    kb_dir: &Path,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = IndexPipeline::new(MockEmbedding::new(), config.knowledge.max_chunk_words);

    match pipeline.build(kb_dir, out_dir).await? {
        BuildOutcome::Built { chunks, dimensions } => {
            tracing::info!(
                chunks,
                dimensions,
                out = %out_dir.display(),
                "Knowledge index built"
            );
        }
        BuildOutcome::EmptyCorpus => {
            tracing::warn!(
                kb = %kb_dir.display(),
                "No text found in the knowledge directory; nothing written"
            );
        }
    }
    Ok(())
}

/// Run one interactive reminder call on the terminal.
async fn run_call(config: &DuecallConfig) -> Result<(), Box<dyn std::error::Error>> {
    let customers = CustomerStore::load(Path::new(&config.call.customers_path))?;
    tracing::info!(
        path = %config.call.customers_path,
        customers = customers.len(),
        "Customer records loaded"
    );

    let script = CallScript::load(Path::new(&config.call.script_path))?;
    tracing::info!(path = %config.call.script_path, lines = script.len(), "Call script loaded");

    // Prefer the persisted index; a canned answerer keeps knowledge
    // questions from failing the call when no index has been built yet.
    let index_dir = Path::new(&config.knowledge.index_dir);
    let answers: Box<dyn DynAnswerService> =
        match KnowledgeSearch::load(index_dir, MockEmbedding::new()) {
            Ok(search) => {
                tracing::info!(chunks = search.len(), dir = %index_dir.display(), "Knowledge index loaded");
                Box::new(ExtractiveAnswerService::new(search, config.knowledge.top_k))
            }
            Err(e) => {
                tracing::warn!(
                    dir = %index_dir.display(),
                    error = %e,
                    "Knowledge index unavailable; run `duecall index` to enable retrieval"
                );
                Box::new(MockAnswerService::default())
            }
        };

    let classifier: Box<dyn Classifier> = Box::new(KeywordClassifier::new());
    let engine = DialogEngine::from_boxed(script, customers, classifier, answers);

    let mut session = Session::new();
    tracing::info!(session = %session.id, "Call session started");
    println!("Call connected. Speak as the customer; the call ends after the closing line.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }

        let reply = engine.handle(&mut session, &line).await?;
        println!("agent> {}", reply);

        if session.state.is_closed() {
            tracing::info!(session = %session.id, "Call closed");
            break;
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("you> ");
    std::io::stdout().flush()
}
