//! CLI argument definitions for the Duecall application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Duecall — a scripted premium-reminder call agent with a searchable
/// knowledge index.
#[derive(Parser, Debug)]
#[command(name = "duecall", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk and embed the knowledge directory into a searchable index.
    Index {
        /// Directory of .txt knowledge documents.
        #[arg(long = "kb-dir")]
        kb_dir: Option<PathBuf>,

        /// Directory to write the index and chunk metadata into.
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,
    },
    /// Run an interactive reminder call on the terminal.
    Call,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > DUECALL_CONFIG env var > ~/.duecall/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DUECALL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".duecall").join("config.toml");
    }
    PathBuf::from("config.toml")
}
