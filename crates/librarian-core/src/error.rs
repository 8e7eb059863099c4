use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A single result identifier could not be parsed. Recovered by the
    /// clusterer; only ever reported through `Diagnostics`.
    #[error("Malformed identifier '{uri}': {reason}")]
    MalformedIdentifier { uri: String, reason: String },

    /// The search engine failed before it produced a result collection.
    #[error("Search aborted: {0}")]
    AbortedSearch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl Error {
    pub fn malformed(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier { uri: uri.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
