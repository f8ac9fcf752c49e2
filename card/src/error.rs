//! Startup and IO failures of the `card` binary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Snapshot needs --at-ms")]
    MissingSnapshotTime,

    #[error("Confirm time {confirm_ms} ms is after the snapshot time {at_ms} ms")]
    ConfirmAfterSnapshot { confirm_ms: u64, at_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
