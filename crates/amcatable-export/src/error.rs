use std::io;

use thiserror::Error;

/// Result type local to amcatable-export.
pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] amcatable_core::Error),

    #[error("export worker panicked: {0}")]
    WorkerPanic(String),

    #[error("failed to spawn export worker: {0}")]
    WorkerSpawn(String),
}
