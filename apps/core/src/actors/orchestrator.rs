use crate::actors::messages::{
    ActorError, AnalysisAck, AppError, ExtensionMessage, OrchestratorMessage,
};
use crate::actors::traits::PageSource;
use crate::cache::AnalysisCache;
use crate::classifier::TextClassifier;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A handle to the `OrchestratorActor`.
///
/// This is the entry point for analysis requests. The actor captures the
/// page's text, classifies it, writes the cache and broadcasts
/// `analysisComplete` to every subscriber.
#[derive(Clone)]
pub struct OrchestratorHandle {
    sender: mpsc::Sender<OrchestratorMessage>,
    results: broadcast::Sender<ExtensionMessage>,
    request_timeout: Duration,
}

impl OrchestratorHandle {
    /// Spawns the orchestrator with the default request timeout.
    pub fn new<P, C>(classifier: TextClassifier, pages: Arc<P>, cache: Arc<C>) -> Self
    where
        P: PageSource,
        C: AnalysisCache + ?Sized,
    {
        Self::with_timeout(classifier, pages, cache, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Spawns the orchestrator and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `classifier` - The classifier applied to every captured page.
    /// * `pages` - Where page text is captured from.
    /// * `cache` - Receives every finished record.
    /// * `request_timeout` - How long `request_analysis` waits for the acknowledgement.
    pub fn with_timeout<P, C>(
        classifier: TextClassifier,
        pages: Arc<P>,
        cache: Arc<C>,
        request_timeout: Duration,
    ) -> Self
    where
        P: PageSource,
        C: AnalysisCache + ?Sized,
    {
        let (sender, receiver) = mpsc::channel(32);
        let (results, _) = broadcast::channel(16);
        let runner = OrchestratorRunner {
            receiver,
            classifier,
            pages,
            cache,
            results: results.clone(),
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            results,
            request_timeout,
        }
    }

    /// Subscribes to finished analyses.
    pub fn subscribe(&self) -> broadcast::Receiver<ExtensionMessage> {
        self.results.subscribe()
    }

    /// Sends `toggleAnalysis` for `target`.
    ///
    /// Returns once the page text has been captured. The record itself
    /// arrives later through `subscribe`.
    #[instrument(skip(self))]
    pub async fn request_analysis(&self, target: &str) -> Result<AnalysisAck, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = OrchestratorMessage::Analyze {
            target: target.to_string(),
            request: ExtensionMessage::ToggleAnalysis,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| ActorError::Closed("Orchestrator closed".to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|_| ActorError::Internal("Orchestrator failed to respond".to_string()))?
    }

    /// Asks the orchestrator to stop after the messages already queued.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(OrchestratorMessage::Shutdown)
            .await
            .map_err(|_| ActorError::Closed("Orchestrator closed".to_string()))?;
        Ok(())
    }
}

// --- Actor Runner ---
struct OrchestratorRunner<P, C>
where
    P: PageSource,
    C: AnalysisCache + ?Sized,
{
    receiver: mpsc::Receiver<OrchestratorMessage>,
    classifier: TextClassifier,
    pages: Arc<P>,
    cache: Arc<C>,
    results: broadcast::Sender<ExtensionMessage>,
}

impl<P, C> OrchestratorRunner<P, C>
where
    P: PageSource,
    C: AnalysisCache + ?Sized,
{
    async fn run(mut self) {
        info!("Orchestrator started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrchestratorMessage::Analyze {
                    target,
                    request,
                    responder,
                } => self.handle_analyze(target, request, responder).await,
                OrchestratorMessage::Shutdown => {
                    info!("Orchestrator shutting down...");
                    break;
                }
            }
        }
        info!("Orchestrator stopped");
    }

    #[instrument(skip(self, request, responder), fields(action = request.action(), request_id = %Uuid::new_v4()))]
    async fn handle_analyze(
        &mut self,
        target: String,
        request: ExtensionMessage,
        responder: oneshot::Sender<Result<AnalysisAck, AppError>>,
    ) {
        let snapshot = match self.pages.capture(&target).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not capture page: {}", e);
                let _ = responder.send(Err(e));
                return;
            }
        };
        let _ = responder.send(Ok(AnalysisAck::analyzing()));

        let record = self.classifier.analyze_bytes(&snapshot.text);
        info!(tone = %record.emotional_tone, "Analysis complete");

        if let Err(e) = self.cache.set(record.clone()).await {
            error!("Failed to store last analysis: {}", e);
        }

        // No subscriber is fine: the cache still has the record
        if self.results.send(ExtensionMessage::AnalysisComplete(record)).is_err() {
            info!("No display listening for analysisComplete");
        }
    }
}
