use crate::types::Mid;
use thiserror::Error;

/// Errors for the remote session description engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No media section is registered under the given mid.
    #[error("media section with mid {0:?} not found")]
    NotFound(Mid),

    /// A negotiation-critical field is missing or invalid in the supplied parameters.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The SDP codec failed to read a textual description.
    #[error("sdp codec: {0}")]
    Codec(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedInput(reason.into())
    }
}
