//! Display - renders analysis records and triggers new analyses.
//!
//! `PopupView` is the plain view model. `DisplayHandle` wires it to the
//! orchestrator: it pre-populates from the cache, listens for
//! `analysisComplete` and re-renders on every record it receives.

use crate::actors::messages::{AppError, ExtensionMessage};
use crate::actors::orchestrator::OrchestratorHandle;
use crate::cache::AnalysisCache;
use crate::classifier::{AnalysisRecord, Resource};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

pub const IDLE_BUTTON_LABEL: &str = "Analyze Page";
pub const BUSY_BUTTON_LABEL: &str = "Analyzing...";
const BUSY_TONE_TEXT: &str = "Analyzing content...";
const CONNECT_ERROR: &str = "Could not connect to page. Please refresh and try again.";
const NO_SUGGESTIONS: &str = "No suggestions available";
const NO_RESOURCES: &str = "No resources available";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListState<T> {
    /// Never populated or populated with an empty list
    Placeholder,
    Items(Vec<T>),
    /// Cleared after a dispatch error
    Cleared,
}

impl<T> ListState<T> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            ListState::Placeholder
        } else {
            ListState::Items(items)
        }
    }
}

/// View model of the popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    analyzing: bool,
    tone_text: String,
    warning: Option<String>,
    suggestions: ListState<String>,
    resources: ListState<Resource>,
}

impl Default for PopupView {
    fn default() -> Self {
        Self {
            analyzing: false,
            tone_text: String::new(),
            warning: None,
            suggestions: ListState::Placeholder,
            resources: ListState::Placeholder,
        }
    }
}

impl PopupView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn button_label(&self) -> &'static str {
        if self.analyzing {
            BUSY_BUTTON_LABEL
        } else {
            IDLE_BUTTON_LABEL
        }
    }

    pub fn tone_text(&self) -> &str {
        &self.tone_text
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Advisory only: the button is disabled but nothing is cancelled.
    pub fn set_loading(&mut self, loading: bool) {
        self.analyzing = loading;
        if loading {
            self.tone_text = BUSY_TONE_TEXT.to_string();
        }
    }

    /// Show a record. A record without a warning keeps the previous warning line.
    pub fn update(&mut self, record: &AnalysisRecord) {
        let mut tone_text = format!("Emotional tone: {}", record.emotional_tone);
        if let Some(stats) = &record.stats {
            let counts = &stats.per_category_counts;
            let _ = write!(tone_text, "\nWords analyzed: {}", stats.word_count);
            let _ = write!(tone_text, "\nPositive words: {}", counts.positive);
            let _ = write!(tone_text, "\nNegative words: {}", counts.negative);
        }
        self.tone_text = tone_text;

        if let Some(warning) = &record.warnings {
            self.warning = Some(warning.clone());
        }

        self.suggestions = ListState::from_items(record.suggestions.clone());
        self.resources = ListState::from_items(record.resources.clone());
    }

    /// Replace the view with a dispatch error.
    pub fn show_error(&mut self, message: &str) {
        self.tone_text = "Error".to_string();
        self.warning = Some(message.to_string());
        self.suggestions = ListState::Cleared;
        self.resources = ListState::Cleared;
    }

    /// Plain-text rendering of the popup
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}]", self.button_label());

        if !self.tone_text.is_empty() {
            let _ = writeln!(out, "{}", self.tone_text);
        }
        if let Some(warning) = &self.warning {
            let _ = writeln!(out, "Warning: {}", warning);
        }

        let _ = writeln!(out, "\nSuggestions:");
        match &self.suggestions {
            ListState::Items(items) => {
                for suggestion in items {
                    let _ = writeln!(out, "  - {}", suggestion);
                }
            }
            ListState::Placeholder => {
                let _ = writeln!(out, "  - {}", NO_SUGGESTIONS);
            }
            ListState::Cleared => {}
        }

        let _ = writeln!(out, "\nResources:");
        match &self.resources {
            ListState::Items(items) => {
                for resource in items {
                    let _ = writeln!(out, "  {} <{}>", resource.title, resource.url);
                    let _ = writeln!(out, "    {}", resource.description);
                }
            }
            ListState::Placeholder => {
                let _ = writeln!(out, "  {}", NO_RESOURCES);
            }
            ListState::Cleared => {}
        }

        out
    }
}

/// A handle to a running display.
#[derive(Clone)]
pub struct DisplayHandle {
    view: Arc<RwLock<PopupView>>,
    orchestrator: OrchestratorHandle,
    latest: watch::Receiver<Option<AnalysisRecord>>,
}

impl DisplayHandle {
    /// Creates the display, pre-populated from `cache`, and starts listening
    /// for `analysisComplete`.
    pub async fn new<C>(orchestrator: OrchestratorHandle, cache: Arc<C>) -> Self
    where
        C: AnalysisCache + ?Sized,
    {
        let view = Arc::new(RwLock::new(PopupView::new()));
        let (latest_tx, latest) = watch::channel(None);

        // Subscribe before loading the cache so nothing sent in between is lost
        let receiver = orchestrator.subscribe();
        Self::load_current_analysis(&view, cache.as_ref()).await;

        tokio::spawn(listen(receiver, view.clone(), latest_tx));

        Self {
            view,
            orchestrator,
            latest,
        }
    }

    async fn load_current_analysis<C>(view: &RwLock<PopupView>, cache: &C)
    where
        C: AnalysisCache + ?Sized,
    {
        match cache.get().await {
            Ok(Some(record)) => {
                info!("Restoring last analysis ({})", record.emotional_tone);
                view.write().await.update(&record);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read last analysis: {}", e),
        }
    }

    /// The "Analyze Page" click: request an analysis of `target`.
    ///
    /// On a dispatch failure the error replaces the view and the button is
    /// re-enabled; the error is also returned.
    pub async fn click_analyze(&self, target: &str) -> Result<(), AppError> {
        self.view.write().await.set_loading(true);

        match self.orchestrator.request_analysis(target).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Analysis request failed: {}", e);
                let message = match &e {
                    AppError::PageUnavailable(msg) if !msg.is_empty() => msg.clone(),
                    AppError::PageUnavailable(_) => CONNECT_ERROR.to_string(),
                    other => other.to_string(),
                };
                let mut view = self.view.write().await;
                view.show_error(&message);
                view.set_loading(false);
                Err(e)
            }
        }
    }

    /// Waits for the next record delivered to this display.
    pub async fn next_analysis(&mut self, wait: Duration) -> Result<AnalysisRecord, AppError> {
        timeout(wait, self.latest.changed())
            .await?
            .map_err(|_| AppError::Internal("Display listener stopped".to_string()))?;
        self.latest
            .borrow_and_update()
            .clone()
            .ok_or_else(|| AppError::Internal("Display received no record".to_string()))
    }

    pub async fn view(&self) -> PopupView {
        self.view.read().await.clone()
    }

    pub async fn render(&self) -> String {
        self.view.read().await.render()
    }
}

async fn listen(
    mut receiver: broadcast::Receiver<ExtensionMessage>,
    view: Arc<RwLock<PopupView>>,
    latest: watch::Sender<Option<AnalysisRecord>>,
) {
    loop {
        match receiver.recv().await {
            Ok(ExtensionMessage::AnalysisComplete(record)) => {
                {
                    let mut view = view.write().await;
                    view.set_loading(false);
                    view.update(&record);
                }
                let _ = latest.send(Some(record));
            }
            Ok(ExtensionMessage::ToggleAnalysis) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Only the newest record matters
                warn!("Display skipped {} stale messages", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
