// WHY: Ordered, first-match-wins mapping from structural features to a document type
// Predicates overlap on purpose; table order resolves ties

use super::{ClassificationResult, DetectedType, FeatureSet};

pub const PLAY_WITH_ACTS_CONFIDENCE: f64 = 0.95;
pub const PLAY_CONFIDENCE: f64 = 0.85;
pub const SONNET_SEQUENCE_CONFIDENCE: f64 = 0.95;
pub const SONNET_CONFIDENCE: f64 = 0.80;
pub const NARRATIVE_POEM_CONFIDENCE: f64 = 0.80;
pub const LYRIC_POEM_CONFIDENCE: f64 = 0.60;

/// Unique numerals needed before a cue-free text reads as a sonnet sequence
pub const SONNET_MIN_NUMERALS: usize = 5;
/// Above this many numerals the sequence is considered long-form
pub const SONNET_SEQUENCE_NUMERALS: usize = 20;
pub const NARRATIVE_MIN_QUOTED_LINES: usize = 10;

struct TypeRule {
    detected_type: DetectedType,
    applies: fn(&FeatureSet) -> bool,
    confidence: fn(&FeatureSet) -> f64,
}

const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        detected_type: DetectedType::Play,
        applies: has_actors_and_blocking,
        confidence: play_confidence,
    },
    TypeRule {
        detected_type: DetectedType::Sonnet,
        applies: has_numbered_sections_without_actors,
        confidence: sonnet_confidence,
    },
    TypeRule {
        detected_type: DetectedType::NarrativePoem,
        applies: has_narrated_quotations,
        confidence: narrative_confidence,
    },
    TypeRule {
        detected_type: DetectedType::LyricPoem,
        applies: has_no_dramatic_structure,
        confidence: lyric_confidence,
    },
];

fn has_actors_and_blocking(f: &FeatureSet) -> bool {
    !f.character_names.is_empty() && f.stage_direction_count > 0
}

fn play_confidence(f: &FeatureSet) -> f64 {
    if f.act_scene_count > 0 {
        PLAY_WITH_ACTS_CONFIDENCE
    } else {
        PLAY_CONFIDENCE
    }
}

fn has_numbered_sections_without_actors(f: &FeatureSet) -> bool {
    f.roman_numeral_count() > SONNET_MIN_NUMERALS && f.character_names.is_empty()
}

fn sonnet_confidence(f: &FeatureSet) -> f64 {
    if f.roman_numeral_count() > SONNET_SEQUENCE_NUMERALS {
        SONNET_SEQUENCE_CONFIDENCE
    } else {
        SONNET_CONFIDENCE
    }
}

fn has_narrated_quotations(f: &FeatureSet) -> bool {
    f.quoted_dialogue_count > NARRATIVE_MIN_QUOTED_LINES && f.has_narrator_tags
}

fn narrative_confidence(_: &FeatureSet) -> f64 {
    NARRATIVE_POEM_CONFIDENCE
}

fn has_no_dramatic_structure(f: &FeatureSet) -> bool {
    f.character_names.is_empty() && f.stage_direction_count == 0
}

fn lyric_confidence(_: &FeatureSet) -> f64 {
    LYRIC_POEM_CONFIDENCE
}

/// Classify a document from its features. Falls back to `Unknown` at 0.0.
pub fn classify_type(features: &FeatureSet) -> ClassificationResult {
    TYPE_RULES
        .iter()
        .find(|rule| (rule.applies)(features))
        .map(|rule| ClassificationResult::new(rule.detected_type, (rule.confidence)(features)))
        .unwrap_or_else(ClassificationResult::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("SPEAKER{i}.")).collect()
    }

    fn numerals(count: usize) -> Vec<String> {
        crate::classifier::patterns::ROMAN_NUMERAL_MARKERS
            .iter()
            .take(count)
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_play_confidence_depends_on_act_markers() {
        let mut features = FeatureSet {
            character_names: names(3),
            stage_direction_count: 4,
            ..Default::default()
        };
        assert_eq!(classify_type(&features), ClassificationResult::new(DetectedType::Play, 0.85));

        features.act_scene_count = 2;
        assert_eq!(classify_type(&features), ClassificationResult::new(DetectedType::Play, 0.95));
    }

    #[test]
    fn test_play_wins_over_every_other_signal() {
        let features = FeatureSet {
            character_names: names(1),
            stage_direction_count: 1,
            roman_numeral_markers: numerals(25),
            quoted_dialogue_count: 40,
            has_narrator_tags: true,
            ..Default::default()
        };
        assert_eq!(classify_type(&features).detected_type, DetectedType::Play);
    }

    #[test]
    fn test_sonnet_thresholds() {
        let features = FeatureSet {
            roman_numeral_markers: numerals(22),
            ..Default::default()
        };
        assert_eq!(classify_type(&features), ClassificationResult::new(DetectedType::Sonnet, 0.95));

        let features = FeatureSet {
            roman_numeral_markers: numerals(6),
            ..Default::default()
        };
        assert_eq!(classify_type(&features), ClassificationResult::new(DetectedType::Sonnet, 0.80));

        // Exactly five numerals is not enough
        let features = FeatureSet {
            roman_numeral_markers: numerals(5),
            ..Default::default()
        };
        assert_eq!(classify_type(&features).detected_type, DetectedType::LyricPoem);
    }

    #[test]
    fn test_sonnet_requires_no_actors() {
        let features = FeatureSet {
            character_names: names(1),
            roman_numeral_markers: numerals(10),
            ..Default::default()
        };
        assert_eq!(classify_type(&features), ClassificationResult::unknown());
    }

    #[test]
    fn test_narrative_poem() {
        let features = FeatureSet {
            character_names: names(2),
            quoted_dialogue_count: 11,
            has_narrator_tags: true,
            ..Default::default()
        };
        assert_eq!(classify_type(&features), ClassificationResult::new(DetectedType::NarrativePoem, 0.80));

        let without_tags = FeatureSet { has_narrator_tags: false, ..features.clone() };
        assert_eq!(classify_type(&without_tags).detected_type, DetectedType::Unknown);

        let too_few_quotes = FeatureSet { quoted_dialogue_count: 10, ..features };
        assert_eq!(classify_type(&too_few_quotes).detected_type, DetectedType::Unknown);
    }

    #[test]
    fn test_lyric_and_unknown_fallbacks() {
        assert_eq!(
            classify_type(&FeatureSet::default()),
            ClassificationResult::new(DetectedType::LyricPoem, 0.60)
        );

        // Blocking without actors is neither a play nor a lyric
        let features = FeatureSet { stage_direction_count: 3, ..Default::default() };
        assert_eq!(classify_type(&features), ClassificationResult::unknown());
    }

    #[test]
    fn test_confidence_always_in_range() {
        for names_count in [0, 1] {
            for stage in [0, 1] {
                for acts in [0, 1] {
                    for numeral_count in [0, 6, 21] {
                        for quoted in [0, 11] {
                            for tags in [false, true] {
                                let features = FeatureSet {
                                    character_names: names(names_count),
                                    stage_direction_count: stage,
                                    act_scene_count: acts,
                                    quoted_dialogue_count: quoted,
                                    roman_numeral_markers: numerals(numeral_count),
                                    has_narrator_tags: tags,
                                };
                                let result = classify_type(&features);
                                assert!((0.0..=1.0).contains(&result.confidence));
                                if names_count > 0 && stage > 0 {
                                    assert_eq!(result.detected_type, DetectedType::Play);
                                }
                                if names_count == 0 && numeral_count > 5 {
                                    assert_eq!(result.detected_type, DetectedType::Sonnet);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
