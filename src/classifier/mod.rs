// WHY: Document-level structure detection, run once per document before any line rewrite

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod document_type;
pub mod features;
pub mod patterns;

pub use document_type::classify_type;
pub use features::FeatureExtractor;
pub use patterns::PatternSet;

/// Structural document kinds the classifier can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedType {
    Play,
    Sonnet,
    NarrativePoem,
    LyricPoem,
    Unknown,
}

impl DetectedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedType::Play => "play",
            DetectedType::Sonnet => "sonnet",
            DetectedType::NarrativePoem => "narrative_poem",
            DetectedType::LyricPoem => "lyric_poem",
            DetectedType::Unknown => "unknown",
        }
    }

    /// Verse forms with no speaker structure at all
    pub fn is_pure_poetry(&self) -> bool {
        matches!(self, DetectedType::Sonnet | DetectedType::LyricPoem)
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural signals gathered from one pass over a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Unique speaker cues in order of first appearance
    pub character_names: Vec<String>,
    pub stage_direction_count: usize,
    pub act_scene_count: usize,
    pub quoted_dialogue_count: usize,
    /// Unique section numerals in order of first appearance
    pub roman_numeral_markers: Vec<String>,
    pub has_narrator_tags: bool,
}

impl FeatureSet {
    pub fn character_count(&self) -> usize {
        self.character_names.len()
    }

    pub fn roman_numeral_count(&self) -> usize {
        self.roman_numeral_markers.len()
    }
}

/// Detected type with a heuristic confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub detected_type: DetectedType,
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(detected_type: DetectedType, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self { detected_type, confidence }
    }

    pub fn unknown() -> Self {
        Self::new(DetectedType::Unknown, 0.0)
    }

    /// Informational only: callers decide what a low score means
    pub fn is_low_confidence(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ClassificationResult::new(DetectedType::Play, 1.7).confidence, 1.0);
        assert_eq!(ClassificationResult::new(DetectedType::Play, -0.2).confidence, 0.0);
        assert_eq!(ClassificationResult::new(DetectedType::Play, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_type_names_match_serialization() {
        for detected in [
            DetectedType::Play,
            DetectedType::Sonnet,
            DetectedType::NarrativePoem,
            DetectedType::LyricPoem,
            DetectedType::Unknown,
        ] {
            let json = serde_json::to_string(&detected).unwrap();
            assert_eq!(json, format!("\"{}\"", detected.as_str()));
        }
    }
}
