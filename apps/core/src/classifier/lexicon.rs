//! Lexicon - Dictionaries and pattern tables used by the classifier.
//!
//! The built-in tables are plain static data. A lexicon can also be loaded
//! from a JSON file so callers (and tests) can substitute their own words.
//! A `Lexicon` is validated and compiled once into a `CompiledLexicon`,
//! which is what `TextClassifier` holds.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::record::{Emotion, EmotionalTone, HealthArea, Resource, ToneCategory};

/// Advice used when a health area has no entry in `health_advice`
pub const FALLBACK_ADVICE: &str = "Take care of your overall well-being";

const POSITIVE_WORDS: &[&str] = &[
    "happy", "good", "great", "excellent", "wonderful", "positive", "joy", "love", "peaceful",
];
const NEGATIVE_WORDS: &[&str] = &[
    "sad", "bad", "terrible", "awful", "negative", "horrible", "angry", "fear", "anxiety",
];
const ANXIETY_WORDS: &[&str] = &["worry", "stress", "anxious", "nervous", "panic", "fear", "dread"];
const CALM_WORDS: &[&str] = &["peaceful", "calm", "relax", "tranquil", "serene", "gentle", "quiet"];

const EMOTION_PATTERNS: &[(Emotion, &str)] = &[
    (Emotion::Joy, "happy|joy|delight|pleased|wonderful"),
    (Emotion::Sadness, "sad|unhappy|depressed|down|miserable"),
    (Emotion::Anger, "angry|furious|mad|rage|outraged"),
    (Emotion::Fear, "scared|afraid|terrified|fearful|anxious"),
    (Emotion::Surprise, "surprised|amazed|astonished|shocked"),
    (Emotion::Love, "love|adore|cherish|caring|affection"),
];

const HEALTH_PATTERNS: &[(HealthArea, &str, &str)] = &[
    (
        HealthArea::Stress,
        "stress|pressure|overwhelm|burnout",
        "Consider practicing mindfulness or deep breathing exercises",
    ),
    (
        HealthArea::Sleep,
        "sleep|insomnia|tired|fatigue|rest",
        "Maintain a regular sleep schedule and avoid screens before bedtime",
    ),
    (
        HealthArea::Exercise,
        "exercise|workout|fitness|active|movement",
        "Try to incorporate regular physical activity into your routine",
    ),
    (
        HealthArea::Diet,
        "food|eat|nutrition|diet|healthy",
        "Focus on balanced, nutritious meals and stay hydrated",
    ),
    (
        HealthArea::Mental,
        "mental|mind|psychology|therapy|counseling",
        "Don't hesitate to seek professional support when needed",
    ),
];

const GENERAL_SUGGESTIONS: &[&str] = &[
    "Take regular breaks while browsing",
    "Practice mindful reading",
    "Consider how this content affects your mood",
];

const NEGATIVE_SUGGESTIONS: &[&str] = &[
    "Consider balancing this content with positive material",
    "Take a break if you feel overwhelmed",
    "Remember to practice self-care",
];
const POSITIVE_SUGGESTIONS: &[&str] = &[
    "Share positive insights with others",
    "Note what makes this content uplifting",
    "Use this positive energy in your daily activities",
];
const NEUTRAL_SUGGESTIONS: &[&str] = &[
    "Reflect on how this information relates to you",
    "Consider different perspectives",
    "Take notes on key points",
];

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Category '{0:?}' contains an empty keyword")]
    EmptyKeyword(ToneCategory),

    #[error("Invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Resource '{title}' has an invalid URL: {source}")]
    InvalidResourceUrl {
        title: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse lexicon file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Keyword lists for the four tone categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneWords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub anxiety: Vec<String>,
    pub calm: Vec<String>,
}

impl ToneWords {
    fn for_category(&self, category: ToneCategory) -> &[String] {
        match category {
            ToneCategory::Positive => &self.positive,
            ToneCategory::Negative => &self.negative,
            ToneCategory::Anxiety => &self.anxiety,
            ToneCategory::Calm => &self.calm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPattern {
    pub emotion: Emotion,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPattern {
    pub area: HealthArea,
    pub pattern: String,
}

/// Raw, serializable dictionaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lexicon {
    pub tone_words: ToneWords,
    /// Evaluated in order; order breaks intensity ties
    pub emotion_patterns: Vec<EmotionPattern>,
    /// Evaluated in order; order is kept in the output
    pub health_patterns: Vec<HealthPattern>,
    #[serde(default)]
    pub health_advice: BTreeMap<HealthArea, String>,
    pub general_suggestions: Vec<String>,
    #[serde(default)]
    pub tone_suggestions: BTreeMap<EmotionalTone, Vec<String>>,
    pub general_resources: Vec<Resource>,
    #[serde(default)]
    pub tone_resources: BTreeMap<EmotionalTone, Vec<Resource>>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn resource(title: &str, url: &str, description: &str) -> Resource {
    Resource {
        title: title.to_string(),
        url: url.to_string(),
        description: description.to_string(),
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let mut tone_suggestions = BTreeMap::new();
        tone_suggestions.insert(EmotionalTone::Negative, owned(NEGATIVE_SUGGESTIONS));
        tone_suggestions.insert(EmotionalTone::Positive, owned(POSITIVE_SUGGESTIONS));
        tone_suggestions.insert(EmotionalTone::Neutral, owned(NEUTRAL_SUGGESTIONS));

        let mut tone_resources = BTreeMap::new();
        tone_resources.insert(
            EmotionalTone::Negative,
            vec![resource(
                "Coping Strategies",
                "https://www.mindful.org/how-to-cope-with-anxiety",
                "Tools and techniques for managing difficult emotions",
            )],
        );
        tone_resources.insert(
            EmotionalTone::Positive,
            vec![resource(
                "Maintaining Wellbeing",
                "https://www.mindful.org/category/meditation",
                "Resources for maintaining positive mental health",
            )],
        );

        Self {
            tone_words: ToneWords {
                positive: owned(POSITIVE_WORDS),
                negative: owned(NEGATIVE_WORDS),
                anxiety: owned(ANXIETY_WORDS),
                calm: owned(CALM_WORDS),
            },
            emotion_patterns: EMOTION_PATTERNS
                .iter()
                .map(|(emotion, pattern)| EmotionPattern {
                    emotion: *emotion,
                    pattern: pattern.to_string(),
                })
                .collect(),
            health_patterns: HEALTH_PATTERNS
                .iter()
                .map(|(area, pattern, _)| HealthPattern {
                    area: *area,
                    pattern: pattern.to_string(),
                })
                .collect(),
            health_advice: HEALTH_PATTERNS
                .iter()
                .map(|(area, _, advice)| (*area, advice.to_string()))
                .collect(),
            general_suggestions: owned(GENERAL_SUGGESTIONS),
            tone_suggestions,
            general_resources: vec![resource(
                "General Mental Health Resources",
                "https://www.mentalhealth.gov",
                "Official mental health resources and information",
            )],
            tone_resources,
        }
    }
}

impl Lexicon {
    /// Load a lexicon from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, LexiconError> {
        info!("Loading lexicon from {:?}", path);
        let raw = fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&raw)?;
        Ok(lexicon)
    }

    /// Validate the tables and compile every pattern
    pub fn compile(self) -> Result<CompiledLexicon, LexiconError> {
        let mut tone_words = Vec::with_capacity(ToneCategory::ALL.len());
        for category in ToneCategory::ALL {
            let words = self.tone_words.for_category(category);
            if words.iter().any(|w| w.is_empty()) {
                return Err(LexiconError::EmptyKeyword(category));
            }
            let lowered = words.iter().map(|w| w.to_lowercase()).collect();
            tone_words.push((category, lowered));
        }

        let emotion_patterns = self
            .emotion_patterns
            .iter()
            .map(|p| Ok((p.emotion, build_pattern(&format!("{:?}", p.emotion), &p.pattern)?)))
            .collect::<Result<Vec<_>, LexiconError>>()?;

        let health_patterns = self
            .health_patterns
            .iter()
            .map(|p| Ok((p.area, build_pattern(&format!("{:?}", p.area), &p.pattern)?)))
            .collect::<Result<Vec<_>, LexiconError>>()?;

        let all_resources = self
            .general_resources
            .iter()
            .chain(self.tone_resources.values().flatten());
        for res in all_resources {
            url::Url::parse(&res.url).map_err(|source| LexiconError::InvalidResourceUrl {
                title: res.title.clone(),
                source,
            })?;
        }

        Ok(CompiledLexicon {
            tone_words,
            emotion_patterns,
            health_patterns,
            source: self,
        })
    }
}

fn build_pattern(name: &str, pattern: &str) -> Result<Regex, LexiconError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| LexiconError::InvalidPattern {
            name: name.to_string(),
            source,
        })
}

/// Validated lexicon with compiled patterns
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    /// Lower-cased keywords, in tie-break order
    pub(crate) tone_words: Vec<(ToneCategory, Vec<String>)>,
    pub(crate) emotion_patterns: Vec<(Emotion, Regex)>,
    pub(crate) health_patterns: Vec<(HealthArea, Regex)>,
    source: Lexicon,
}

impl CompiledLexicon {
    pub fn advice_for(&self, area: HealthArea) -> &str {
        self.source
            .health_advice
            .get(&area)
            .map(String::as_str)
            .unwrap_or(FALLBACK_ADVICE)
    }

    /// General suggestions followed by the tone-specific ones, if any
    pub fn suggestions_for(&self, tone: EmotionalTone) -> Vec<String> {
        let mut suggestions = self.source.general_suggestions.clone();
        if let Some(specific) = self.source.tone_suggestions.get(&tone) {
            suggestions.extend(specific.iter().cloned());
        }
        suggestions
    }

    /// General resources followed by the tone-specific ones, if any
    pub fn resources_for(&self, tone: EmotionalTone) -> Vec<Resource> {
        let mut resources = self.source.general_resources.clone();
        if let Some(specific) = self.source.tone_resources.get(&tone) {
            resources.extend(specific.iter().cloned());
        }
        resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_compiles() {
        let compiled = Lexicon::default().compile().unwrap();
        assert_eq!(compiled.tone_words.len(), 4);
        assert_eq!(compiled.emotion_patterns.len(), 6);
        assert_eq!(compiled.health_patterns.len(), 5);
        assert_eq!(compiled.tone_words[0].0, ToneCategory::Positive);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let compiled = Lexicon::default().compile().unwrap();
        let (_, joy) = &compiled.emotion_patterns[0];
        assert_eq!(joy.find_iter("HAPPY Joy delight").count(), 3);
    }

    #[test]
    fn test_case_folding_is_unicode_aware() {
        let compiled = Lexicon::default().compile().unwrap();
        let (_, sadness) = &compiled.emotion_patterns[1];
        // U+017F LATIN SMALL LETTER LONG S folds to "s"
        assert!(sadness.is_match("\u{17f}ad"));
    }

    #[test]
    fn test_suggestions_by_tone() {
        let compiled = Lexicon::default().compile().unwrap();

        assert_eq!(compiled.suggestions_for(EmotionalTone::Negative).len(), 6);
        assert_eq!(compiled.suggestions_for(EmotionalTone::Neutral).len(), 6);
        // Anxiety and Calm have no specific list
        assert_eq!(compiled.suggestions_for(EmotionalTone::Anxiety).len(), 3);
        assert_eq!(compiled.suggestions_for(EmotionalTone::Calm).len(), 3);
    }

    #[test]
    fn test_resources_by_tone() {
        let compiled = Lexicon::default().compile().unwrap();

        let positive = compiled.resources_for(EmotionalTone::Positive);
        assert_eq!(positive.len(), 2);
        assert_eq!(positive[0].title, "General Mental Health Resources");
        assert_eq!(positive[1].title, "Maintaining Wellbeing");

        assert_eq!(compiled.resources_for(EmotionalTone::Error).len(), 1);
    }

    #[test]
    fn test_missing_advice_falls_back() {
        let mut lexicon = Lexicon::default();
        lexicon.health_advice.remove(&HealthArea::Diet);
        let compiled = lexicon.compile().unwrap();

        assert_eq!(compiled.advice_for(HealthArea::Diet), FALLBACK_ADVICE);
        assert_eq!(
            compiled.advice_for(HealthArea::Sleep),
            "Maintain a regular sleep schedule and avoid screens before bedtime"
        );
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let mut lexicon = Lexicon::default();
        lexicon.tone_words.calm.push(String::new());

        let err = lexicon.compile().unwrap_err();
        assert!(matches!(err, LexiconError::EmptyKeyword(ToneCategory::Calm)));
    }

    #[test]
    fn test_rejects_invalid_pattern() {
        let mut lexicon = Lexicon::default();
        lexicon.emotion_patterns[2].pattern = "angry|(furious".to_string();

        let err = lexicon.compile().unwrap_err();
        assert!(err.to_string().contains("Anger"));
    }

    #[test]
    fn test_rejects_invalid_resource_url() {
        let mut lexicon = Lexicon::default();
        lexicon.general_resources[0].url = "not a url".to_string();

        let err = lexicon.compile().unwrap_err();
        assert!(matches!(err, LexiconError::InvalidResourceUrl { .. }));
    }

    #[test]
    fn test_lexicon_json_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        let mut lexicon = Lexicon::default();
        lexicon.tone_words.positive = vec!["sunny".to_string()];
        fs::write(&path, serde_json::to_string_pretty(&lexicon).unwrap()).unwrap();

        let loaded = Lexicon::from_json_file(&path).unwrap();
        assert_eq!(loaded, lexicon);
    }
}
