//! Interactive acquisition of the code text and the API credential.
//!
//! Every prompt here is a small validation loop with an explicit accepted
//! set: invalid source-mode tokens and unreadable file paths are recovered by
//! reprompting, never surfaced as failures.

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{bail, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Password};
use tracing::debug;

use crate::domain::SourceMode;
use crate::utils::{is_binary_file, read_file_safe};

/// Print `prompt` and read one line from stdin, without the trailing
/// newline. EOF is an error: the reprompt loops would otherwise spin
/// forever on a closed input stream.
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask whether the code comes from a file or the terminal. Reprompts
/// indefinitely until one of the accepted tokens is entered.
pub fn prompt_source_mode() -> Result<SourceMode> {
    loop {
        let token = prompt_line(
            "Would you like the code to be read from a local file or entered as a \
             single line in the terminal? ('file' or 'terminal'): ",
        )?;
        match SourceMode::parse(&token) {
            Some(mode) => return Ok(mode),
            None => println!("{}", style("Invalid input. Please try again.").red()),
        }
    }
}

/// Capture a single line of code typed at the terminal.
pub fn prompt_terminal_code() -> Result<String> {
    prompt_line("Enter the code you would like summarized: ")
}

/// Ask for a local file path until one can be read as text. A missing or
/// unreadable file reports and asks for a new path; binary files are
/// rejected the same way.
pub fn prompt_file_code() -> Result<String> {
    loop {
        let entered = prompt_line("Enter the local path of the file: ")?;
        let path = Path::new(&entered);

        if !path.is_file() {
            println!("File not found at {entered}");
            continue;
        }
        if is_binary_file(path) {
            println!("That file looks like binary data, not source text. Please try another.");
            continue;
        }
        match read_file_safe(path) {
            Ok((content, encoding)) => {
                debug!(path = %entered, %encoding, "code file read");
                println!("{}", style("Code read successfully.").green());
                return Ok(content);
            }
            Err(err) => {
                println!("Error reading code: {err}");
            }
        }
    }
}

/// Acquire the API credential: the `OPENAI_API_KEY` environment variable if
/// set, otherwise a one-time prompt. The value is threaded through the
/// session config; the process environment is never written back.
pub fn acquire_api_key() -> Result<String> {
    if let Ok(key) = env::var("OPENAI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }

    if io::stdin().is_terminal() {
        let key = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your OpenAI API key")
            .interact()?;
        Ok(key)
    } else {
        prompt_line("Enter your OpenAI API key: ")
    }
}
