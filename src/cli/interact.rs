//! Interactive session driver.
//!
//! Prompts for the code and the credential, prints the automatic overview,
//! then loops on questions until the user enters `exit`. Whatever happens
//! after ingestion funnels into a single handler: the staging directory is
//! removed and the user sees a session-ended message, success or error.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use super::Cli;
use crate::config::{load_config, SessionConfig};
use crate::domain::SourceMode;
use crate::ingest;
use crate::llm::OpenAiClient;
use crate::session::Session;
use crate::store::{self, SqliteFragmentStore};

const DIVIDER: &str = "--------------------------------------------------";

pub(super) fn run(cli: &Cli) -> Result<()> {
    println!("This app summarizes code and lets you ask questions about the code to help you learn.");
    println!();

    let root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let outcome = drive(cli, &root);
    store::cleanup_staging(&root);

    match outcome {
        Ok(()) => println!("Session ended"),
        Err(err) => println!("Session ended with an error: {err:#}"),
    }
    Ok(())
}

fn drive(cli: &Cli, root: &Path) -> Result<()> {
    // Input and credential errors are recovered inside these prompts by
    // reprompting; they never surface as failures.
    let mode = ingest::prompt_source_mode()?;
    let code = match mode {
        SourceMode::Terminal => ingest::prompt_terminal_code()?,
        SourceMode::File => ingest::prompt_file_code()?,
    };
    let api_key = ingest::acquire_api_key()?;

    let file_config = load_config(root, cli.config.as_deref())?;
    let config = SessionConfig::resolve(&cli.overrides(), file_config, api_key)?;

    let store = SqliteFragmentStore::open(root)?;
    let llm = OpenAiClient::new(
        &config.model,
        &config.api_key,
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let mut session = Session::new(config, Box::new(store), Box::new(llm));
    session.ingest(&code)?;

    println!();
    println!("Here is a summary of the code:");
    println!();
    let overview = with_spinner("Summarizing...", || session.overview())?;
    println!("{overview}");
    println!("{DIVIDER}");

    println!("Do you have any other questions about the code?");
    loop {
        let question = ingest::prompt_line("Question (enter 'exit' to exit): ")?;
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        println!("That's a good question! Generating response...");
        let answer = with_spinner("Waiting for the model...", || session.ask(&question))?;
        println!("{DIVIDER}");
        println!("{answer}");
    }

    Ok(())
}

fn with_spinner<T>(message: &str, task: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    let result = task();
    spinner.finish_and_clear();
    result
}
