//! Session-scoped tabular fragment storage.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::domain::Fragment;

pub mod sqlite;

pub use sqlite::SqliteFragmentStore;

/// Relative staging location for the session's tabular artifacts. Destroyed
/// unconditionally at session end.
pub const STAGING_DIR: &str = "code_mentor_data";

/// The two tabular artifacts a session maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Ordered fragments of the ingested code.
    Code,
    /// Ordered fragments of the rolling summary.
    Summary,
}

impl FragmentKind {
    fn table(self) -> &'static str {
        match self {
            FragmentKind::Code => "code_fragments",
            FragmentKind::Summary => "summary_fragments",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("staging path failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered fragment persistence.
///
/// One writer and one reader (the same process); each write replaces the
/// whole artifact, and reads return insertion order.
pub trait FragmentStore {
    /// Drop and re-create the artifact, then insert `fragments` in order.
    fn replace(&mut self, kind: FragmentKind, fragments: &[Fragment]) -> Result<(), StoreError>;

    /// Read the artifact back in insertion order.
    fn read(&self, kind: FragmentKind) -> Result<Vec<Fragment>, StoreError>;

    /// Number of rows currently stored for the artifact.
    fn count(&self, kind: FragmentKind) -> Result<usize, StoreError>;
}

/// Remove the staging directory under `root`, best effort.
///
/// Runs on both the success and the error path of a session; a failure to
/// delete is logged rather than allowed to mask the session outcome.
pub fn cleanup_staging(root: &Path) {
    let dir = root.join(STAGING_DIR);
    if dir.exists() {
        if let Err(err) = fs::remove_dir_all(&dir) {
            warn!(dir = %dir.display(), %err, "failed to remove staging directory");
        }
    }
}
