use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationIndexError {
    #[error("Duplicate station id '{0}' in snapshot")]
    DuplicateId(String),

    #[error("Failed to read station snapshot '{0}'")]
    SnapshotRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse station JSON data")]
    JsonParse(#[from] serde_json::Error),
}
