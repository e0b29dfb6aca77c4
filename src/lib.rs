pub mod classifier;
pub mod dialogue;
pub mod discovery;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod reader;
pub mod report;
pub mod validation;

// Re-export main types for convenient access
pub use classifier::{classify_type, ClassificationResult, DetectedType, FeatureExtractor, FeatureSet, PatternSet};
pub use dialogue::{
    normalize_dialogue, normalize_dialogue_into, DialogueState, LineClassifier, LineRecord, LineRole,
    PunctuationCounts, ScanSummary,
};
pub use processor::{DocumentProcessor, ProcessedDocument, ProcessorConfig};
pub use validation::{validate, ProcessingMode, ValidationReport};

// Re-export file handling utilities
pub use output::{generate_backup_path, generate_output_path};
pub use pipeline::{resolve_file_arguments, Pipeline};
pub use report::{ExitCode, FileReport, FileStatus, RunReport, ValidationRunReport};
