//! Record persistence for the sensor agent.
//!
//! Tables are opaque append-only sinks: the sensor hands a record and a
//! table name to the store and moves on. Failure handling is the store's
//! concern; callers log and continue.

pub mod jsonl;

// Re-export commonly used types
pub use jsonl::JsonlStore;

/// Append-only table sink for sensor records.
pub trait Store: Send {
    /// Append one record to the named table.
    fn save(&mut self, table: &str, record: serde_json::Value) -> Result<(), StoreError>;
}

/// Persistence errors.
#[derive(Debug)]
pub enum StoreError {
    IoError(String),
    SerializeError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {e}"),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}
