//! Core domain types shared across the crate.
//!
//! A [`Fragment`] is one bounded slice of text (code or summary) with a
//! stable, content-derived id and its position in the ordered sequence.
//! [`SourceMode`] is how the code text is acquired. The constants bound the
//! partitioner: the default per-fragment character ceiling and the minimum
//! length below which a trailing fragment is dropped.

use crate::utils::stable_hash;

/// Default per-fragment character bound when nothing overrides it.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 10_000;

/// Shortest acceptable trailing fragment; anything shorter is dropped.
pub const MIN_FRAGMENT_LEN: usize = 30;

/// One ordered slice of text with a stable, content-derived id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Zero-based position in the ordered fragment sequence.
    pub seq: usize,
    /// Stable id derived from `seq` and the fragment's content.
    pub id: String,
    /// The fragment's text.
    pub text: String,
}

impl Fragment {
    /// Build a fragment at `seq` from `text`, deriving its stable id.
    pub fn new(seq: usize, text: String) -> Self {
        let id = stable_hash(&text, seq);
        Self { seq, id, text }
    }

    /// Number of Unicode scalar values in the fragment's text.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Where the code text is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Read from a local file path.
    File,
    /// Read a single line typed at the terminal.
    Terminal,
}

impl SourceMode {
    /// Parse one of the accepted tokens (`file` or `terminal`),
    /// case-insensitively, returning `None` for anything else.
    pub fn parse(token: &str) -> Option<SourceMode> {
        match token.trim().to_ascii_lowercase().as_str() {
            "file" => Some(SourceMode::File),
            "terminal" => Some(SourceMode::Terminal),
            _ => None,
        }
    }
}
