//! Analysis Record - Output structure of the text classifier.
//!
//! One record is produced per page snapshot. It is serialized with camelCase
//! keys because it travels as the payload of the `analysisComplete` message
//! and is persisted as-is under the `lastAnalysis` key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall emotional tone of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmotionalTone {
    Positive,
    Negative,
    Neutral,
    Anxiety,
    Calm,
    /// Analysis failed; the record carries the failure in `warnings`
    Error,
}

impl EmotionalTone {
    /// Returns the capitalized display label
    pub fn label(&self) -> &'static str {
        match self {
            EmotionalTone::Positive => "Positive",
            EmotionalTone::Negative => "Negative",
            EmotionalTone::Neutral => "Neutral",
            EmotionalTone::Anxiety => "Anxiety",
            EmotionalTone::Calm => "Calm",
            EmotionalTone::Error => "Error",
        }
    }
}

impl fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword category used for dominant tone scoring.
///
/// The declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneCategory {
    Positive,
    Negative,
    Anxiety,
    Calm,
}

impl ToneCategory {
    pub const ALL: [ToneCategory; 4] = [
        ToneCategory::Positive,
        ToneCategory::Negative,
        ToneCategory::Anxiety,
        ToneCategory::Calm,
    ];

    pub fn tone(&self) -> EmotionalTone {
        match self {
            ToneCategory::Positive => EmotionalTone::Positive,
            ToneCategory::Negative => EmotionalTone::Negative,
            ToneCategory::Anxiety => EmotionalTone::Anxiety,
            ToneCategory::Calm => EmotionalTone::Calm,
        }
    }
}

/// Named emotion detected by pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Love,
}

/// Health area a page touches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthArea {
    Stress,
    Sleep,
    Exercise,
    Diet,
    Mental,
}

/// Keyword hit counts per tone category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
    pub anxiety: usize,
    pub calm: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: ToneCategory) -> usize {
        match category {
            ToneCategory::Positive => self.positive,
            ToneCategory::Negative => self.negative,
            ToneCategory::Anxiety => self.anxiety,
            ToneCategory::Calm => self.calm,
        }
    }

    pub fn set(&mut self, category: ToneCategory, count: usize) {
        match category {
            ToneCategory::Positive => self.positive = count,
            ToneCategory::Negative => self.negative = count,
            ToneCategory::Anxiety => self.anxiety = count,
            ToneCategory::Calm => self.calm = count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    /// Whitespace-delimited non-empty tokens
    pub word_count: usize,
    /// Pieces produced by splitting on `.`, `!` and `?` runs
    pub sentence_count: usize,
    pub per_category_counts: CategoryCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingTime {
    pub minutes: usize,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub emotion: Emotion,
    pub intensity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthImpact {
    pub area: HealthArea,
    pub relevance: usize,
    pub advice: String,
}

/// A link shown next to the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Complete result of analyzing one page snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub emotional_tone: EmotionalTone,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TextStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<ReadingTime>,

    #[serde(default)]
    pub top_emotions: Vec<EmotionScore>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_summary: Option<String>,

    #[serde(default)]
    pub health_impact: Vec<HealthImpact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl AnalysisRecord {
    pub fn is_error(&self) -> bool {
        self.emotional_tone == EmotionalTone::Error
    }
}
