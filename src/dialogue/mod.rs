// WHY: Per-line dialogue detection and the punctuation rewrite applied to spoken text

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub mod line_classifier;
pub mod punctuation;

pub use line_classifier::{DialogueScan, LineClassifier};
pub use punctuation::{normalize_dialogue, normalize_dialogue_into, PunctuationCounts};

/// Role assigned to a single line by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    StageDirection,
    Metadata,
    InlineSpeech,
    CharacterName,
    Blank,
    DialogueContinuation,
    Unclassified,
}

impl LineRole {
    /// Roles whose text passes through the normalizer
    pub fn is_spoken(&self) -> bool {
        matches!(self, LineRole::InlineSpeech | LineRole::DialogueContinuation)
    }
}

/// The single "in dialogue" bit, scoped to one document scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogueState {
    pub(crate) in_dialogue: bool,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dialogue(&self) -> bool {
        self.in_dialogue
    }
}

/// Classification and output for one line.
/// Verbatim lines borrow the input; rewritten lines own their text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord<'a> {
    pub role: LineRole,
    /// Speaker token of an inline speech, e.g. `Ber.`
    pub speaker: Option<&'a str>,
    /// Dialogue text of an inline speech, without the line ending
    pub dialogue: Option<&'a str>,
    pub output: Cow<'a, str>,
    pub changed: bool,
}

impl<'a> LineRecord<'a> {
    pub(crate) fn verbatim(role: LineRole, line: &'a str) -> Self {
        Self {
            role,
            speaker: None,
            dialogue: None,
            output: Cow::Borrowed(line),
            changed: false,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Line totals per role for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub stage_directions: usize,
    pub metadata: usize,
    pub inline_speech: usize,
    pub character_names: usize,
    pub blank: usize,
    pub dialogue: usize,
    pub unclassified: usize,
}

impl RoleCounts {
    pub fn record(&mut self, role: LineRole) {
        let slot = match role {
            LineRole::StageDirection => &mut self.stage_directions,
            LineRole::Metadata => &mut self.metadata,
            LineRole::InlineSpeech => &mut self.inline_speech,
            LineRole::CharacterName => &mut self.character_names,
            LineRole::Blank => &mut self.blank,
            LineRole::DialogueContinuation => &mut self.dialogue,
            LineRole::Unclassified => &mut self.unclassified,
        };
        *slot += 1;
    }
}

/// Reported at the end of a scan; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub lines_total: usize,
    pub lines_modified: usize,
    /// Lines that went through the normalizer, changed or not
    pub lines_spoken: usize,
    pub roles: RoleCounts,
    pub punctuation: PunctuationCounts,
}

impl ScanSummary {
    pub fn lines_unchanged(&self) -> usize {
        self.lines_total - self.lines_modified
    }
}

/// Split text into lines, each keeping its own `\n` or `\r\n`
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}
