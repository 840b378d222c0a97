//! Session lifecycle: configuration and injected capabilities.
//!
//! One user, one terminal session, strictly sequential. The session owns the
//! resolved config (credential included), the fragment store, and the LLM
//! client; the staging directory it writes under is destroyed by the CLI
//! driver on both the success and the error path.

use anyhow::Result;
use tracing::debug;

use crate::chunk::partition;
use crate::config::SessionConfig;
use crate::llm::Summarizer;
use crate::store::{FragmentKind, FragmentStore};
use crate::summarize::{Reducer, OVERVIEW_QUESTION};

pub struct Session {
    config: SessionConfig,
    store: Box<dyn FragmentStore>,
    llm: Box<dyn Summarizer>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        store: Box<dyn FragmentStore>,
        llm: Box<dyn Summarizer>,
    ) -> Self {
        Self { config, store, llm }
    }

    /// Partition the ingested code and persist the fragment set. Returns the
    /// number of fragments stored.
    pub fn ingest(&mut self, code: &str) -> Result<usize> {
        let fragments = partition(code, self.config.max_chunk_size);
        let stored = fragments.len();
        self.store.replace(FragmentKind::Code, &fragments)?;
        debug!(fragments = stored, "code ingested");
        Ok(stored)
    }

    /// The automatic post-ingest overview (at most three sentences).
    pub fn overview(&mut self) -> Result<String> {
        self.ask(OVERVIEW_QUESTION)
    }

    /// Answer a free-form question about the ingested code.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        Reducer::new(&mut *self.store, &*self.llm, self.config.max_chunk_size).answer(question)
    }
}
