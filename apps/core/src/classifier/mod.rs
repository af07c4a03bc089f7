//! # Classifier Module
//!
//! Fast, deterministic page tone analysis. No model, no network: keyword
//! counting and regex matching against a fixed lexicon.
//!
//! ## Components
//! - `lexicon`: Dictionaries and pattern tables (built-in or loaded from JSON)
//! - `text_stats`: Word/sentence counts, reading time and summary
//! - `record`: Output data structure
//! - `analyzer`: Main entry point (`TextClassifier`)

pub mod analyzer;
pub mod lexicon;
pub mod record;
pub mod text_stats;

pub use analyzer::{ClassificationFailure, ClassifierError, TextClassifier};
pub use lexicon::{CompiledLexicon, Lexicon, LexiconError};
pub use record::{
    AnalysisRecord, CategoryCounts, Emotion, EmotionScore, EmotionalTone, HealthArea,
    HealthImpact, ReadingTime, Resource, TextStats, ToneCategory,
};
