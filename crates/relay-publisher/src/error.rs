use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WordPress returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown post status: {0}")]
    InvalidStatus(String),
}
