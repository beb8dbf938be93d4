//! Error types for weft-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A request against a single node failed. Recovered by the retry loop.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no gateway nodes configured")]
    NoNodes,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("max retries exceeded ({attempts} attempts): {last_error}")]
    RetriesExhausted {
        attempts:   u32,
        #[source]
        last_error: Box<Error>,
    },

    #[error("chunk protocol violation: {0}")]
    ChunkProtocol(String),

    #[error("error retrieving {id} from chunks, this may be a cancelled transaction: {source}")]
    ChunkReconstruction {
        id:     String,
        #[source]
        source: Box<Error>,
    },

    #[error("malformed cache artifact {path:?}: {source}")]
    CacheRead {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write cache artifact {path:?}: {source}")]
    CacheWrite {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid base64url data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("dangling base64 fragment of {0} character at end of stream")]
    InvalidBase64Tail(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn http(url: &str, err: impl std::fmt::Display) -> Self {
        Error::Http {
            url:     url.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the top-level caller should treat this as fatal for the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::RetriesExhausted { .. } | Error::NoNodes | Error::Config(_)
        )
    }
}
