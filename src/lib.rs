//! code-mentor: summarize source code and ask questions about it
//!
//! An interactive CLI that ingests a block of source code, partitions it
//! into LLM-sized fragments, persists the fragments in a session-scoped
//! tabular store, and drives an iterative summarize-and-reduce loop until
//! the summary fits a single model call. Follow-up questions are answered
//! against the code itself (one fragment) or the converged summary.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod llm;
pub mod session;
pub mod store;
pub mod summarize;
pub mod utils;
