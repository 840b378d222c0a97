//! rusqlite-backed fragment store.
//!
//! The database lives at a fixed relative staging path under the session
//! data directory; each write drops and re-creates its table.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use super::{FragmentKind, FragmentStore, StoreError, STAGING_DIR};
use crate::domain::Fragment;

const DB_SUBPATH: &str = "tmp/fragments.sqlite";

pub struct SqliteFragmentStore {
    conn: Connection,
}

impl SqliteFragmentStore {
    /// Open the staging database under `root` (conventionally the process
    /// working directory), creating the staging directory and empty tables.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let db_path = root.join(STAGING_DIR).join(DB_SUBPATH);
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&db_path)?;
        // Empty tables up front so reads before the first write see zero
        // rows instead of a missing-table error.
        for kind in [FragmentKind::Code, FragmentKind::Summary] {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     seq INTEGER PRIMARY KEY,
                     id TEXT NOT NULL,
                     text TEXT NOT NULL,
                     created_at TEXT NOT NULL
                 );",
                kind.table()
            ))?;
        }
        debug!(db = %db_path.display(), "staging database opened");
        Ok(Self { conn })
    }
}

impl FragmentStore for SqliteFragmentStore {
    fn replace(&mut self, kind: FragmentKind, fragments: &[Fragment]) -> Result<(), StoreError> {
        let table = kind.table();
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 seq INTEGER PRIMARY KEY,
                 id TEXT NOT NULL,
                 text TEXT NOT NULL,
                 created_at TEXT NOT NULL
             );"
        ))?;
        let created_at = Utc::now().to_rfc3339();
        for fragment in fragments {
            tx.execute(
                &format!("INSERT INTO {table} (seq, id, text, created_at) VALUES (?1, ?2, ?3, ?4)"),
                params![fragment.seq as i64, fragment.id, fragment.text, created_at],
            )?;
        }
        tx.commit()?;
        debug!(table, rows = fragments.len(), "fragment set persisted");
        Ok(())
    }

    fn read(&self, kind: FragmentKind) -> Result<Vec<Fragment>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT seq, id, text FROM {} ORDER BY seq", kind.table()))?;
        let rows = stmt.query_map([], |row| {
            Ok(Fragment {
                seq: row.get::<_, i64>(0)? as usize,
                id: row.get(1)?,
                text: row.get(2)?,
            })
        })?;
        let mut fragments = Vec::new();
        for row in rows {
            fragments.push(row?);
        }
        Ok(fragments)
    }

    fn count(&self, kind: FragmentKind) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
