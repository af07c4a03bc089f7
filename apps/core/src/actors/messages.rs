use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::classifier::AnalysisRecord;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The receiving actor has stopped.
    #[error("Actor closed: {0}")]
    Closed(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages exchanged between the display and the page context.
///
/// Wire shape: `{"action": "toggleAnalysis"}` and
/// `{"action": "analysisComplete", "data": { ... }}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum ExtensionMessage {
    /// Ask the page context to analyze its current text.
    ToggleAnalysis,
    /// A finished analysis, sent to every display and to the cache.
    AnalysisComplete(AnalysisRecord),
}

impl ExtensionMessage {
    pub fn action(&self) -> &'static str {
        match self {
            ExtensionMessage::ToggleAnalysis => "toggleAnalysis",
            ExtensionMessage::AnalysisComplete(_) => "analysisComplete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzing,
}

/// Immediate answer to a `toggleAnalysis` request: `{"status": "analyzing"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisAck {
    pub status: AnalysisStatus,
}

impl AnalysisAck {
    pub fn analyzing() -> Self {
        Self {
            status: AnalysisStatus::Analyzing,
        }
    }
}

/// Messages that can be sent to the `OrchestratorActor`.
#[derive(Debug)]
pub enum OrchestratorMessage {
    /// Analyze the page identified by `target`.
    Analyze {
        target: String,
        request: ExtensionMessage,
        /// Acknowledges the request once the page text has been captured.
        responder: oneshot::Sender<Result<AnalysisAck, AppError>>,
    },
    /// A command to stop the orchestrator loop.
    Shutdown,
}
