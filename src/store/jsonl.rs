//! JSON-lines table store.
//!
//! Each table is one `<table>.jsonl` file under the store root, appended to
//! record by record. Good enough for field studies where the data is synced
//! off the device in bulk.

use crate::store::{Store, StoreError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct JsonlStore {
    root: PathBuf,
}

impl JsonlStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing the named table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.jsonl"))
    }

    /// Number of records in the named table. Zero if the table does not
    /// exist yet.
    pub fn record_count(&self, table: &str) -> usize {
        std::fs::read_to_string(self.table_path(table))
            .map(|content| content.lines().filter(|l| !l.trim().is_empty()).count())
            .unwrap_or(0)
    }
}

impl Store for JsonlStore {
    fn save(&mut self, table: &str, record: serde_json::Value) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StoreError::IoError(e.to_string()))?;

        let line = serde_json::to_string(&record)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        writeln!(file, "{line}").map_err(|e| StoreError::IoError(e.to_string()))?;
        Ok(())
    }
}
