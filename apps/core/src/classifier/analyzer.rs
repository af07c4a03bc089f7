//! Text Classifier - turns page text into an `AnalysisRecord`.
//!
//! Single pass, no hidden state: the same text and lexicon always give the
//! same record. `analyze` never fails outward; failures become a record with
//! the `Error` tone so consumers handle one shape only.
//!
//! Keyword counting is substring based, so "sadness" counts for "sad".

use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use super::lexicon::{CompiledLexicon, Lexicon, LexiconError};
use super::record::{
    AnalysisRecord, CategoryCounts, EmotionScore, EmotionalTone, HealthImpact, TextStats,
};
use super::text_stats;
use crate::config::ClassifierConfig;

const NEGATIVE_CONTENT_WARNING: &str =
    "This content contains a high amount of negative emotional content.";

/// Why a snapshot could not be classified
#[derive(Debug, Error)]
pub enum ClassificationFailure {
    #[error("input is {len} bytes, limit is {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// Why a classifier could not be built
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error("Invalid classifier settings: {0}")]
    Config(#[from] validator::ValidationErrors),
}

/// Keyword and pattern based page classifier
#[derive(Debug, Clone)]
pub struct TextClassifier {
    lexicon: CompiledLexicon,
    config: ClassifierConfig,
}

impl TextClassifier {
    /// Create a classifier with the built-in lexicon and default settings
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_lexicon(Lexicon::default(), ClassifierConfig::default())
    }

    /// Validate `config` and compile `lexicon`
    pub fn with_lexicon(
        lexicon: Lexicon,
        config: ClassifierConfig,
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self {
            lexicon: lexicon.compile()?,
            config,
        })
    }

    /// Analyze a page's text
    pub fn analyze(&self, text: &str) -> AnalysisRecord {
        match self.try_analyze(text) {
            Ok(record) => record,
            Err(e) => self.error_record(&e),
        }
    }

    /// Analyze a raw snapshot; bytes that are not UTF-8 yield an `Error` record
    pub fn analyze_bytes(&self, bytes: &[u8]) -> AnalysisRecord {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.analyze(text),
            Err(e) => self.error_record(&ClassificationFailure::from(e)),
        }
    }

    fn try_analyze(&self, text: &str) -> Result<AnalysisRecord, ClassificationFailure> {
        let start = Instant::now();

        if text.len() > self.config.max_input_bytes {
            return Err(ClassificationFailure::InputTooLarge {
                len: text.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let lowered = text.to_lowercase();

        // 1-3. Tone from keyword categories
        let counts = self.count_categories(&lowered);
        let tone = dominant_tone(&counts);

        let stats = TextStats {
            word_count: text_stats::word_count(text),
            sentence_count: text_stats::sentence_count(text),
            per_category_counts: counts,
        };

        // 4-7. Independent pattern passes
        let top_emotions = self.detect_emotions(text);
        let reading_time = text_stats::reading_time(text, self.config.words_per_minute);
        let summary = text_stats::summarize(
            text,
            self.config.summary_sentences,
            self.config.summary_max_chars,
        );
        let health_impact = self.assess_health(text);

        // 8. Tone-driven guidance
        let warnings = (counts.negative > counts.positive * 2)
            .then(|| NEGATIVE_CONTENT_WARNING.to_string());

        debug!(
            tone = %tone,
            words = stats.word_count,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Text classified"
        );

        Ok(AnalysisRecord {
            emotional_tone: tone,
            stats: Some(stats),
            reading_time: Some(reading_time),
            top_emotions,
            content_summary: Some(summary),
            health_impact,
            warnings,
            suggestions: self.lexicon.suggestions_for(tone),
            resources: self.lexicon.resources_for(tone),
        })
    }

    fn count_categories(&self, lowered: &str) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for (category, words) in &self.lexicon.tone_words {
            let hits = words.iter().map(|w| lowered.matches(w.as_str()).count()).sum();
            counts.set(*category, hits);
        }
        counts
    }

    fn detect_emotions(&self, text: &str) -> Vec<EmotionScore> {
        let mut scores: Vec<EmotionScore> = self
            .lexicon
            .emotion_patterns
            .iter()
            .map(|(emotion, pattern)| EmotionScore {
                emotion: *emotion,
                intensity: pattern.find_iter(text).count(),
            })
            .filter(|s| s.intensity > 0)
            .collect();

        // Stable: ties keep pattern order
        scores.sort_by(|a, b| b.intensity.cmp(&a.intensity));
        scores.truncate(self.config.top_emotions);
        scores
    }

    fn assess_health(&self, text: &str) -> Vec<HealthImpact> {
        self.lexicon
            .health_patterns
            .iter()
            .filter_map(|(area, pattern)| {
                let mentions = pattern.find_iter(text).count();
                (mentions > 0).then(|| HealthImpact {
                    area: *area,
                    relevance: mentions,
                    advice: self.lexicon.advice_for(*area).to_string(),
                })
            })
            .collect()
    }

    fn error_record(&self, err: &ClassificationFailure) -> AnalysisRecord {
        warn!("Content analysis failed: {}", err);

        // The built-in lexicon defines no Error list, so this is the general list
        let resources = self.lexicon.resources_for(EmotionalTone::Error);

        AnalysisRecord {
            emotional_tone: EmotionalTone::Error,
            stats: None,
            reading_time: None,
            top_emotions: Vec::new(),
            content_summary: None,
            health_impact: Vec::new(),
            warnings: Some(format!("Error analyzing content: {}", err)),
            suggestions: Vec::new(),
            resources,
        }
    }
}

/// Highest-count category; ties go to the earlier category, all-zero is Neutral
fn dominant_tone(counts: &CategoryCounts) -> EmotionalTone {
    let mut best = (EmotionalTone::Neutral, 0);
    for category in super::record::ToneCategory::ALL {
        let count = counts.get(category);
        if count > best.1 {
            best = (category.tone(), count);
        }
    }
    best.0
}
