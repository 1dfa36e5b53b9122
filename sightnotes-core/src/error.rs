use thiserror::Error;

/// Failures talking to a note source.
///
/// None of these are fatal to the viewer: the poller turns them into
/// `is_live = false` and the session store into an empty result.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source answered but has nothing to serve yet (no capture running).
    #[error("source is not producing notes")]
    NotReady,

    /// Non-success HTTP status other than "not ready".
    #[error("unexpected status {0}")]
    Status(u16),

    /// The body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Local filesystem failure (directory source only).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A session filename that is not a plain `.md` file name.
    #[error("invalid session name: {0}")]
    InvalidName(String),

    /// The configured base URL cannot be parsed.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
