//! Actor System Tests
//!
//! Tests for the orchestrator and the display, driven by in-memory pages.

use crate::actors::display::{DisplayHandle, BUSY_BUTTON_LABEL, IDLE_BUTTON_LABEL};
use crate::actors::messages::{ActorError, AnalysisAck, AppError, ExtensionMessage};
use crate::actors::orchestrator::OrchestratorHandle;
use crate::actors::traits::PageSource;
use crate::cache::{AnalysisCache, MemoryCache};
use crate::classifier::{AnalysisRecord, EmotionalTone, TextClassifier};
use crate::page_extract::{PageSnapshot, StaticPageSource};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};

const WAIT: Duration = Duration::from_secs(5);

// ============================================================================
// Mocks for Testing
// ============================================================================

/// Page source that takes a while to answer
pub struct SlowPageSource {
    pub delay_ms: u64,
}

#[async_trait]
impl PageSource for SlowPageSource {
    async fn capture(&self, target: &str) -> Result<PageSnapshot, AppError> {
        sleep(Duration::from_millis(self.delay_ms)).await;
        Ok(PageSnapshot {
            target: target.to_string(),
            text: b"slow but happy".to_vec(),
        })
    }
}

/// Cache whose writes always fail
pub struct BrokenCache;

#[async_trait]
impl AnalysisCache for BrokenCache {
    async fn set(&self, _record: AnalysisRecord) -> Result<(), AppError> {
        Err(AppError::Internal("Mock failure".to_string()))
    }

    async fn get(&self) -> Result<Option<AnalysisRecord>, AppError> {
        Err(AppError::Internal("Mock failure".to_string()))
    }
}

fn pages() -> Arc<StaticPageSource> {
    Arc::new(
        StaticPageSource::new()
            .with_page("news", "Terrible news. A sad and awful day for everyone.")
            .with_page("blog", "A happy, peaceful morning. I love it!")
            .with_page("binary", vec![0x66, 0xff, 0xfe]),
    )
}

fn classifier() -> TextClassifier {
    TextClassifier::new().expect("Built-in lexicon must compile")
}

// ============================================================================
// Orchestrator
// ============================================================================

#[cfg(test)]
mod orchestrator_tests {
    use super::*;

    #[tokio::test]
    async fn test_request_is_acknowledged_then_broadcast() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let mut results = orchestrator.subscribe();

        let ack = orchestrator.request_analysis("blog").await.unwrap();
        assert_eq!(ack, AnalysisAck::analyzing());

        let message = timeout(WAIT, results.recv()).await.unwrap().unwrap();
        let ExtensionMessage::AnalysisComplete(record) = message else {
            panic!("Expected analysisComplete");
        };
        assert_eq!(record.emotional_tone, EmotionalTone::Positive);

        // The cache is written before the broadcast
        assert_eq!(cache.get().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_unknown_target_is_reported_to_caller() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());

        let err = orchestrator.request_analysis("missing-tab").await.unwrap_err();
        assert!(matches!(err, AppError::PageUnavailable(_)));
        assert_eq!(err.to_string(), "No active page found");
        assert!(cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_page_yields_error_record() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let mut results = orchestrator.subscribe();

        orchestrator.request_analysis("binary").await.unwrap();
        let ExtensionMessage::AnalysisComplete(record) =
            timeout(WAIT, results.recv()).await.unwrap().unwrap()
        else {
            panic!("Expected analysisComplete");
        };

        assert!(record.is_error());
        assert!(record.warnings.unwrap().starts_with("Error analyzing content"));
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_result() {
        let orchestrator =
            OrchestratorHandle::new(classifier(), pages(), Arc::new(MemoryCache::new()));
        let mut first = orchestrator.subscribe();
        let mut second = orchestrator.subscribe();

        orchestrator.request_analysis("news").await.unwrap();

        let a = timeout(WAIT, first.recv()).await.unwrap().unwrap();
        let b = timeout(WAIT, second.recv()).await.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.action(), "analysisComplete");
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_block_delivery() {
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), Arc::new(BrokenCache));
        let mut results = orchestrator.subscribe();

        orchestrator.request_analysis("news").await.unwrap();
        let message = timeout(WAIT, results.recv()).await.unwrap().unwrap();
        assert_eq!(message.action(), "analysisComplete");
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let orchestrator = OrchestratorHandle::with_timeout(
            classifier(),
            Arc::new(SlowPageSource { delay_ms: 500 }),
            Arc::new(MemoryCache::new()),
            Duration::from_millis(50),
        );

        let err = orchestrator.request_analysis("any").await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_fail() {
        let orchestrator =
            OrchestratorHandle::new(classifier(), pages(), Arc::new(MemoryCache::new()));
        orchestrator.shutdown().await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let err = orchestrator.request_analysis("blog").await.unwrap_err();
        assert!(matches!(err, AppError::Actor(ActorError::Closed(_))));
    }

    #[tokio::test]
    async fn test_concurrent_requests_leave_one_record() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let mut results = orchestrator.subscribe();

        let (a, b) = tokio::join!(
            orchestrator.request_analysis("news"),
            orchestrator.request_analysis("blog")
        );
        a.unwrap();
        b.unwrap();

        let mut last = None;
        for _ in 0..2 {
            if let ExtensionMessage::AnalysisComplete(record) =
                timeout(WAIT, results.recv()).await.unwrap().unwrap()
            {
                last = Some(record);
            }
        }

        // Last write wins
        assert_eq!(cache.get().await.unwrap(), last);
    }
}

// ============================================================================
// Display
// ============================================================================

#[cfg(test)]
mod display_tests {
    use super::*;

    #[tokio::test]
    async fn test_display_prepopulates_from_cache() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(classifier().analyze("So sad and awful")).await.unwrap();

        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let display = DisplayHandle::new(orchestrator, cache).await;

        let rendered = display.render().await;
        assert!(rendered.contains("Emotional tone: Negative"));
        assert!(rendered.contains("Negative words: 2"));
    }

    #[tokio::test]
    async fn test_display_with_empty_cache_shows_placeholders() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let display = DisplayHandle::new(orchestrator, cache).await;

        let rendered = display.render().await;
        assert!(rendered.contains("No suggestions available"));
        assert!(rendered.contains("No resources available"));
    }

    #[tokio::test]
    async fn test_unreadable_cache_leaves_view_empty() {
        let orchestrator =
            OrchestratorHandle::new(classifier(), pages(), Arc::new(MemoryCache::new()));
        let display = DisplayHandle::new(orchestrator, Arc::new(BrokenCache)).await;

        assert_eq!(display.view().await.tone_text(), "");
    }

    #[tokio::test]
    async fn test_click_updates_view_with_result() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let mut display = DisplayHandle::new(orchestrator, cache).await;

        display.click_analyze("news").await.unwrap();
        let record = display.next_analysis(WAIT).await.unwrap();
        assert_eq!(record.emotional_tone, EmotionalTone::Negative);

        let view = display.view().await;
        assert!(!view.is_analyzing());
        assert_eq!(view.button_label(), IDLE_BUTTON_LABEL);
        assert!(view.tone_text().starts_with("Emotional tone: Negative"));
        assert!(view.warning().is_some());
        assert!(display.render().await.contains("Coping Strategies"));
    }

    #[tokio::test]
    async fn test_click_on_missing_page_shows_error() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let display = DisplayHandle::new(orchestrator, cache).await;

        let err = display.click_analyze("missing-tab").await.unwrap_err();
        assert!(matches!(err, AppError::PageUnavailable(_)));

        let view = display.view().await;
        assert!(!view.is_analyzing());
        assert_eq!(view.tone_text(), "Error");
        assert_eq!(view.warning(), Some("No active page found"));

        let rendered = display.render().await;
        assert!(!rendered.contains("No suggestions available"));
        assert!(!rendered.contains("No resources available"));
    }

    #[tokio::test]
    async fn test_button_busy_while_page_is_captured() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(
            classifier(),
            Arc::new(SlowPageSource { delay_ms: 200 }),
            cache.clone(),
        );
        let mut display = DisplayHandle::new(orchestrator, cache).await;

        let clicker = display.clone();
        let click = tokio::spawn(async move { clicker.click_analyze("slow").await });

        sleep(Duration::from_millis(50)).await;
        assert_eq!(display.view().await.button_label(), BUSY_BUTTON_LABEL);

        click.await.unwrap().unwrap();
        let record = display.next_analysis(WAIT).await.unwrap();
        assert_eq!(record.emotional_tone, EmotionalTone::Positive);
        assert_eq!(display.view().await.button_label(), IDLE_BUTTON_LABEL);
    }

    #[tokio::test]
    async fn test_two_displays_render_same_result() {
        let cache = Arc::new(MemoryCache::new());
        let orchestrator = OrchestratorHandle::new(classifier(), pages(), cache.clone());
        let mut first = DisplayHandle::new(orchestrator.clone(), cache.clone()).await;
        let mut second = DisplayHandle::new(orchestrator, cache).await;

        first.click_analyze("blog").await.unwrap();
        first.next_analysis(WAIT).await.unwrap();
        second.next_analysis(WAIT).await.unwrap();

        let first_view = first.view().await;
        let second_view = second.view().await;
        assert_eq!(first_view.tone_text(), second_view.tone_text());
    }
}
