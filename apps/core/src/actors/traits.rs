use crate::actors::messages::AppError;
use crate::page_extract::PageSnapshot;
use async_trait::async_trait;

/// Defines where page text comes from.
///
/// This trait abstracts the page context (a browser tab, a file on disk, an
/// in-memory fixture) so the orchestrator can be driven by any of them.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Captures the visible text of the page identified by `target`.
    ///
    /// Fails with `AppError::PageUnavailable` when the page cannot be reached.
    async fn capture(&self, target: &str) -> Result<PageSnapshot, AppError>;
}
