// WHY: Single pass over a whole document collecting the structural counts the type rules need

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::patterns::PatternSet;
use super::FeatureSet;

/// Extracts a [`FeatureSet`] from document text. Stateless between calls.
pub struct FeatureExtractor {
    patterns: Arc<PatternSet>,
}

impl FeatureExtractor {
    pub fn new(patterns: Arc<PatternSet>) -> Self {
        Self { patterns }
    }

    /// Total over any input; each signal is evaluated independently per line
    pub fn extract_features(&self, text: &str) -> FeatureSet {
        let mut features = FeatureSet::default();
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_numerals: HashSet<&str> = HashSet::new();

        for line in text.lines() {
            let trimmed = line.trim();

            if self.patterns.is_character_cue(trimmed) && seen_names.insert(trimmed) {
                features.character_names.push(trimmed.to_string());
            }

            if self.patterns.is_stage_direction(trimmed) {
                features.stage_direction_count += 1;
            }

            if trimmed.starts_with("ACT") || trimmed.starts_with("SCENE") {
                features.act_scene_count += 1;
            }

            // Indentation matters here, so the raw line is matched
            if self.patterns.is_quoted_dialogue(line) {
                features.quoted_dialogue_count += 1;
            }

            if self.patterns.is_roman_numeral(trimmed) && seen_numerals.insert(trimmed) {
                features.roman_numeral_markers.push(trimmed.to_string());
            }

            // Sticky for the rest of the document
            if !features.has_narrator_tags && self.patterns.has_narrator_tag(line) {
                features.has_narrator_tags = true;
            }
        }

        debug!(
            characters = features.character_count(),
            stage_directions = features.stage_direction_count,
            act_scene = features.act_scene_count,
            quoted = features.quoted_dialogue_count,
            numerals = features.roman_numeral_count(),
            narrator_tags = features.has_narrator_tags,
            "Extracted document features"
        );

        features
    }
}
