//! Error types for the `hex_island` crate.
//!
//! Generation itself never fails; these cover configuration, export and
//! save-file handling.

use crate::hex::HexCoord;

/// Errors surfaced to callers of the fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum IslandError {
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generation parameter is out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A save file carries no seed to regenerate the island from.
    #[error("save file has no seed")]
    MissingSeed,

    /// A save file was written by an incompatible format version.
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version stored in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// A save file references a tile that does not exist on the island.
    #[error("coordinate {0} is outside the island")]
    OutOfBounds(HexCoord),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IslandError>;
