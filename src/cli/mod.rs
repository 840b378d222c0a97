//! Command-line interface for code-mentor
//!
//! The binary surface carries configuration flags only; the session itself
//! is driven by interactive prompts.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::CliOverrides;

mod interact;

/// Summarize source code and answer questions about it with an LLM
#[derive(Parser)]
#[command(name = "code-mentor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (code-mentor.toml or .code-mentor.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chat model used for summaries and answers
    #[arg(long, value_name = "NAME", env = "CODE_MENTOR_MODEL")]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, value_name = "URL", env = "CODE_MENTOR_BASE_URL")]
    base_url: Option<String>,

    /// Maximum characters per fragment eligible for a single LLM call
    #[arg(long, value_name = "CHARS", env = "CODE_MENTOR_MAX_CHUNK_SIZE")]
    max_chunk_size: Option<usize>,

    /// HTTP timeout for LLM requests, in seconds
    #[arg(long, value_name = "SECS", env = "CODE_MENTOR_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_chunk_size: self.max_chunk_size,
            request_timeout_secs: self.timeout_secs,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    interact::run(&cli)
}
