// WHY: Turns a classification into a yes/no processing verdict before any file is touched
// Pure poetry has no speakers, so rewriting it would only strip its punctuation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::classifier::{ClassificationResult, DetectedType, FeatureSet};
use crate::processor::ProcessorConfig;

const SAMPLE_CHARACTER_NAMES: usize = 5;
const SAMPLE_ROMAN_NUMERALS: usize = 10;

/// How dialogue is carried in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Speaker cues and inline speeches
    Dialogue,
    /// Speech marked by quotation inside narration
    Quoted,
    None,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Dialogue => "dialogue",
            ProcessingMode::Quoted => "quoted",
            ProcessingMode::None => "none",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts plus short samples of the collected names and numerals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub character_count: usize,
    pub sample_characters: Vec<String>,
    pub stage_direction_count: usize,
    pub act_scene_count: usize,
    pub quoted_dialogue_count: usize,
    pub roman_numeral_count: usize,
    pub sample_roman_numerals: Vec<String>,
    pub has_narrator_tags: bool,
}

impl From<&FeatureSet> for FeatureSummary {
    fn from(features: &FeatureSet) -> Self {
        Self {
            character_count: features.character_count(),
            sample_characters: features.character_names.iter().take(SAMPLE_CHARACTER_NAMES).cloned().collect(),
            stage_direction_count: features.stage_direction_count,
            act_scene_count: features.act_scene_count,
            quoted_dialogue_count: features.quoted_dialogue_count,
            roman_numeral_count: features.roman_numeral_count(),
            sample_roman_numerals: features
                .roman_numeral_markers
                .iter()
                .take(SAMPLE_ROMAN_NUMERALS)
                .cloned()
                .collect(),
            has_narrator_tags: features.has_narrator_tags,
        }
    }
}

/// Verdict for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub filepath: String,
    pub detected_type: DetectedType,
    pub confidence: f64,
    pub is_processable: bool,
    pub processing_mode: ProcessingMode,
    pub features: FeatureSummary,
    pub warnings: Vec<String>,
    pub recommendation: String,
}

impl ValidationReport {
    /// Human-readable block for terminal output
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("File: {}\n", self.filepath));
        out.push_str(&format!("  File Type: {}\n", self.detected_type));
        out.push_str(&format!("  Confidence: {:.0}%\n", self.confidence * 100.0));
        out.push_str(&format!(
            "  Processable: {}\n",
            if self.is_processable { "Yes" } else { "No" }
        ));
        out.push_str(&format!("  Processing Mode: {}\n", self.processing_mode));

        let f = &self.features;
        out.push_str("  Features:\n");
        out.push_str(&format!("    Character names: {}", f.character_count));
        if !f.sample_characters.is_empty() {
            out.push_str(&format!(" ({})", f.sample_characters.join(", ")));
        }
        out.push('\n');
        out.push_str(&format!("    Stage directions: {}\n", f.stage_direction_count));
        out.push_str(&format!("    Act/Scene markers: {}\n", f.act_scene_count));
        out.push_str(&format!("    Quoted dialogue lines: {}\n", f.quoted_dialogue_count));
        out.push_str(&format!("    Roman numerals: {}", f.roman_numeral_count));
        if !f.sample_roman_numerals.is_empty() {
            out.push_str(&format!(" ({})", f.sample_roman_numerals.join(", ")));
        }
        out.push('\n');
        out.push_str(&format!(
            "    Narrator tags: {}\n",
            if f.has_narrator_tags { "yes" } else { "no" }
        ));

        if !self.warnings.is_empty() {
            out.push_str("  Warnings:\n");
            for warning in &self.warnings {
                out.push_str(&format!("    - {warning}\n"));
            }
        }
        out.push_str(&format!("  Recommendation: {}\n", self.recommendation));
        out
    }
}

/// Decide whether a classified document may be rewritten
pub fn validate(
    path: &Path,
    features: &FeatureSet,
    classification: &ClassificationResult,
    config: &ProcessorConfig,
) -> ValidationReport {
    let mut warnings = Vec::new();

    let (is_processable, processing_mode, recommendation) = match classification.detected_type {
        DetectedType::Play => (
            true,
            ProcessingMode::Dialogue,
            "Safe to process: speaker cues and stage directions found".to_string(),
        ),
        DetectedType::NarrativePoem => {
            warnings.push("Narrative poem: speech is carried by quotation marks, not speaker cues".to_string());
            (
                true,
                ProcessingMode::Quoted,
                "Review the output: only lines following detected speaker cues are rewritten".to_string(),
            )
        }
        DetectedType::Sonnet | DetectedType::LyricPoem => {
            warnings.push(format!(
                "Detected pure poetry ({}); stripping punctuation would damage the verse",
                classification.detected_type
            ));
            (
                false,
                ProcessingMode::None,
                "Do not process. Use --force only if this file is really a play".to_string(),
            )
        }
        DetectedType::Unknown => {
            warnings.push("Could not determine the document type".to_string());
            (
                true,
                ProcessingMode::Dialogue,
                "Inspect the file manually or try --dry-run before processing".to_string(),
            )
        }
    };

    if classification.is_low_confidence(config.min_confidence) {
        warnings.push(format!(
            "Low confidence: {:.0}% is below the {:.0}% threshold",
            classification.confidence * 100.0,
            config.min_confidence * 100.0
        ));
    }

    ValidationReport {
        filepath: path.display().to_string(),
        detected_type: classification.detected_type,
        confidence: classification.confidence,
        is_processable,
        processing_mode,
        features: FeatureSummary::from(features),
        warnings,
        recommendation,
    }
}
