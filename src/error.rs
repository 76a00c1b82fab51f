//! Error types for bindery operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading an export or resolving its assets.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a book export (no revision.json): {0}")]
    NotABookExport(PathBuf),

    #[error("failed to fetch asset {uid} from {url}: {reason}")]
    AssetFetch {
        uid: String,
        url: String,
        reason: String,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
