//! Last-analysis cache.
//!
//! A single slot holding the most recent `AnalysisRecord`. `set` always
//! overwrites; there is no expiry and no versioning.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::classifier::AnalysisRecord;
use crate::error::AppError;

/// Key under which the record is stored in key-value backends
pub const LAST_ANALYSIS_KEY: &str = "lastAnalysis";

/// Store for the most recent analysis
#[async_trait]
pub trait AnalysisCache: Send + Sync + 'static {
    /// Replace the cached record unconditionally.
    async fn set(&self, record: AnalysisRecord) -> Result<(), AppError>;

    /// The cached record, if any.
    async fn get(&self) -> Result<Option<AnalysisRecord>, AppError>;
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RwLock<Option<AnalysisRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisCache for MemoryCache {
    async fn set(&self, record: AnalysisRecord) -> Result<(), AppError> {
        *self.slot.write().await = Some(record);
        Ok(())
    }

    async fn get(&self) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(self.slot.read().await.clone())
    }
}
