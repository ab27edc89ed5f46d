use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::FeedError;

/// A single-shot price source driven by `PollService`.
///
/// Implementations do one network round-trip per call and classify failures
/// into the `FeedError` taxonomy; the poll loop decides what to do with them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short source name for log lines.
    fn name(&self) -> &'static str;

    async fn fetch_price(&self) -> Result<f64, FeedError>;
}
