use thiserror::Error;

/// Failure taxonomy for a single fetch attempt or feed message.
///
/// Neither kind ever reaches the command layer: transient failures leave the
/// snapshot stale (or substitute the configured fallback constant), malformed
/// payloads are dropped whole with no partial state mutation.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or API failure; the last known snapshot stays usable.
    #[error("transient fetch failure: {0}")]
    Transient(String),
    /// The payload arrived but could not be interpreted.
    #[error("malformed feed payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Malformed(err.to_string())
        } else {
            FeedError::Transient(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Malformed(err.to_string())
    }
}
