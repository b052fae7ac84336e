use thiserror::Error;

/// Why a single source contributed nothing to a poll
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("record serialization failed: {0}")]
    Serialization(String),
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that escape a poll to its caller
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no token sources configured")]
    NoSources,
    #[error("invalid discovery config: {0}")]
    InvalidConfig(String),
    #[error("a discovery poll is already in flight")]
    PollInProgress,
}
