// WHY: In-memory pipeline for one document: features, type, verdict, then the line rewrite
// Holds the compiled patterns so a whole run pays for regex compilation once

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::classifier::{classify_type, ClassificationResult, FeatureExtractor, FeatureSet, PatternSet};
use crate::dialogue::{LineClassifier, ScanSummary};
use crate::validation::{validate, ValidationReport};

/// Processing knobs shared by validation and rewriting
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Confidence below this adds a warning; it never changes the verdict
    pub min_confidence: f64,
    /// Refuse to rewrite documents that read as pure poetry
    pub block_poetry: bool,
    pub create_backup: bool,
    pub dry_run: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            block_poetry: true,
            create_backup: true,
            dry_run: false,
        }
    }
}

/// Classification of a document before any rewrite
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub features: FeatureSet,
    pub classification: ClassificationResult,
}

/// Rewritten text plus everything learned along the way
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub analysis: DocumentAnalysis,
    pub output: String,
    pub summary: ScanSummary,
}

impl ProcessedDocument {
    pub fn is_modified(&self) -> bool {
        self.summary.lines_modified > 0
    }
}

pub struct DocumentProcessor {
    config: ProcessorConfig,
    extractor: FeatureExtractor,
    classifier: LineClassifier,
}

impl DocumentProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let patterns = Arc::new(PatternSet::compile()?);
        Ok(Self::with_patterns(config, patterns))
    }

    /// Build around already compiled patterns
    pub fn with_patterns(config: ProcessorConfig, patterns: Arc<PatternSet>) -> Self {
        Self {
            config,
            extractor: FeatureExtractor::new(Arc::clone(&patterns)),
            classifier: LineClassifier::new(patterns),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn line_classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn analyze(&self, text: &str) -> DocumentAnalysis {
        let features = self.extractor.extract_features(text);
        let classification = classify_type(&features);
        debug!(
            detected_type = %classification.detected_type,
            confidence = classification.confidence,
            "Classified document"
        );
        DocumentAnalysis { features, classification }
    }

    /// Classify and build the processing verdict for `path`
    pub fn validate_text(&self, path: &Path, text: &str) -> ValidationReport {
        let analysis = self.analyze(text);
        validate(path, &analysis.features, &analysis.classification, &self.config)
    }

    /// Rewrite dialogue punctuation without classifying
    pub fn rewrite(&self, text: &str) -> (String, ScanSummary) {
        self.classifier.rewrite(text)
    }

    /// Classify, then rewrite dialogue punctuation. Never blocks; callers check the verdict.
    pub fn process_text(&self, text: &str) -> ProcessedDocument {
        let analysis = self.analyze(text);
        let (output, summary) = self.rewrite(text);

        info!(
            detected_type = %analysis.classification.detected_type,
            lines = summary.lines_total,
            modified = summary.lines_modified,
            "Processed document"
        );

        ProcessedDocument { analysis, output, summary }
    }
}
