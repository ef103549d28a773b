//! Error types for the recognition library

use std::path::PathBuf;

use thiserror::Error;

/// Library error variants
///
/// Recognition itself never fails; these cover the edges where input enters
/// the crate and the live session's thread boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Locale code not in the vocabulary tables
    #[error("unknown locale: {0:?} (expected \"en\" or \"de\")")]
    UnknownLocale(String),

    /// Input file could not be read
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Frame file is not valid observation JSON
    #[error("malformed frame in {path} at line {line}")]
    Frame {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The session worker has shut down
    #[error("recognition session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
