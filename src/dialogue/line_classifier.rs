// WHY: One-bit state machine deciding, line by line, which text is spoken dialogue
// Rules are evaluated top to bottom and the first match wins; order is load-bearing:
// headers and cast rows must be caught before cue detection, and inline speech
// before bare cues so the opening sentence of a speech is not lost.

use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

use crate::classifier::patterns::{is_all_caps, starts_with_any, PatternSet, METADATA_PREFIXES};

use super::punctuation::{normalize_dialogue, PunctuationCounts};
use super::{split_lines, DialogueState, LineRecord, LineRole, ScanSummary};

/// All-caps lines longer than this are headers even without a space
const LONG_CAPS_LINE: usize = 20;

/// Effect of a matched rule on the dialogue bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Keep,
    Enter,
    Leave,
}

/// The three views of a raw line every rule works from
struct LineView<'a> {
    raw: &'a str,
    /// Raw line without trailing whitespace or newline
    content: &'a str,
    trimmed: &'a str,
}

impl<'a> LineView<'a> {
    fn new(raw: &'a str) -> Self {
        let content = raw.trim_end();
        Self {
            raw,
            content,
            trimmed: content.trim_start(),
        }
    }
}

type RulePredicate = fn(&LineClassifier, &LineView<'_>, &DialogueState) -> bool;

struct LineRule {
    role: LineRole,
    matches: RulePredicate,
    transition: Transition,
}

const LINE_RULES: &[LineRule] = &[
    LineRule {
        role: LineRole::StageDirection,
        matches: is_stage_direction,
        transition: Transition::Keep,
    },
    LineRule {
        role: LineRole::Metadata,
        matches: is_metadata,
        transition: Transition::Leave,
    },
    LineRule {
        role: LineRole::InlineSpeech,
        matches: is_inline_speech,
        transition: Transition::Enter,
    },
    LineRule {
        role: LineRole::CharacterName,
        matches: is_character_name,
        transition: Transition::Enter,
    },
    // A blank inside a speech (e.g. around an embedded stage direction) must not end it
    LineRule {
        role: LineRole::Blank,
        matches: is_blank,
        transition: Transition::Keep,
    },
];

fn is_stage_direction(classifier: &LineClassifier, line: &LineView<'_>, _: &DialogueState) -> bool {
    classifier.patterns.is_stage_direction(line.trimmed)
}

fn is_metadata(_: &LineClassifier, line: &LineView<'_>, state: &DialogueState) -> bool {
    let trimmed = line.trimmed;
    if trimmed.is_empty() {
        return false;
    }

    let length = trimmed.chars().count();
    let caps_header = is_all_caps(trimmed) && length > 1 && (trimmed.contains(' ') || length > LONG_CAPS_LINE);
    // Cast-list rows ("HAMLET, son to the late King") only outside a speech.
    // Crude: a comma-bearing speech line right after a header is caught here too.
    let cast_row = !state.in_dialogue && trimmed.contains(", ");

    caps_header || starts_with_any(trimmed, METADATA_PREFIXES) || cast_row
}

fn is_inline_speech(classifier: &LineClassifier, line: &LineView<'_>, _: &DialogueState) -> bool {
    classifier.patterns.split_inline_speech(line.content).is_some()
}

fn is_character_name(classifier: &LineClassifier, line: &LineView<'_>, _: &DialogueState) -> bool {
    classifier.patterns.is_character_cue(line.trimmed)
}

fn is_blank(_: &LineClassifier, line: &LineView<'_>, _: &DialogueState) -> bool {
    line.trimmed.is_empty()
}

/// Assigns a [`LineRole`] to each line and rewrites spoken text
pub struct LineClassifier {
    patterns: Arc<PatternSet>,
}

impl LineClassifier {
    pub fn new(patterns: Arc<PatternSet>) -> Self {
        Self { patterns }
    }

    /// Classify one raw line (including its line ending) and advance `state`.
    /// Only the role of the current line and the incoming bit are consulted.
    pub fn classify_line<'a>(
        &self,
        line: &'a str,
        state: &mut DialogueState,
        counts: &mut PunctuationCounts,
    ) -> LineRecord<'a> {
        let view = LineView::new(line);

        for rule in LINE_RULES {
            if (rule.matches)(self, &view, state) {
                let record = match rule.role {
                    LineRole::InlineSpeech => self.render_inline_speech(&view, counts),
                    role => LineRecord::verbatim(role, line),
                };
                match rule.transition {
                    Transition::Keep => {}
                    Transition::Enter => state.in_dialogue = true,
                    Transition::Leave => state.in_dialogue = false,
                }
                return record;
            }
        }

        if state.in_dialogue {
            let (normalized, changed) = normalize_dialogue(line, counts);
            LineRecord {
                role: LineRole::DialogueContinuation,
                speaker: None,
                dialogue: None,
                output: owned_if_changed(line, normalized, changed),
                changed,
            }
        } else {
            LineRecord::verbatim(LineRole::Unclassified, line)
        }
    }

    /// Keep the speaker token as written and normalize only the speech after it
    fn render_inline_speech<'a>(&self, view: &LineView<'a>, counts: &mut PunctuationCounts) -> LineRecord<'a> {
        let Some(split) = self.patterns.split_inline_speech(view.content) else {
            return LineRecord::verbatim(LineRole::InlineSpeech, view.raw);
        };

        let (normalized, _) = normalize_dialogue(&view.raw[split.dialogue_start..], counts);

        let mut output = String::with_capacity(view.raw.len());
        output.push_str(&view.raw[..split.speaker_end]);
        output.push(' ');
        output.push_str(&normalized);
        let changed = output != view.raw;

        LineRecord {
            role: LineRole::InlineSpeech,
            speaker: Some(&view.raw[split.speaker_start..split.speaker_end]),
            dialogue: Some(&view.content[split.dialogue_start..]),
            output: owned_if_changed(view.raw, output, changed),
            changed,
        }
    }

    /// Start a fresh per-document scan with dialogue off and zeroed counters
    pub fn begin_scan(&self) -> DialogueScan<'_> {
        DialogueScan {
            classifier: self,
            state: DialogueState::new(),
            summary: ScanSummary::default(),
        }
    }

    /// Stream a whole document through a fresh scan
    pub fn rewrite(&self, text: &str) -> (String, ScanSummary) {
        let mut scan = self.begin_scan();
        let mut output = String::with_capacity(text.len());

        for line in split_lines(text) {
            output.push_str(scan.feed(line).output());
        }

        let summary = scan.finish();
        debug!(
            lines = summary.lines_total,
            modified = summary.lines_modified,
            spoken = summary.lines_spoken,
            removed = summary.punctuation.total(),
            "Dialogue scan finished"
        );
        (output, summary)
    }
}

fn owned_if_changed<'a>(original: &'a str, rewritten: String, changed: bool) -> Cow<'a, str> {
    if changed {
        Cow::Owned(rewritten)
    } else {
        Cow::Borrowed(original)
    }
}

/// Dialogue state and counters for one document; dropped when the document is done
pub struct DialogueScan<'c> {
    classifier: &'c LineClassifier,
    state: DialogueState,
    summary: ScanSummary,
}

impl DialogueScan<'_> {
    pub fn feed<'a>(&mut self, line: &'a str) -> LineRecord<'a> {
        let record = self
            .classifier
            .classify_line(line, &mut self.state, &mut self.summary.punctuation);

        self.summary.lines_total += 1;
        if record.changed {
            self.summary.lines_modified += 1;
        }
        if record.role.is_spoken() {
            self.summary.lines_spoken += 1;
        }
        self.summary.roles.record(record.role);
        record
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn finish(self) -> ScanSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    static SHARED_CLASSIFIER: OnceLock<LineClassifier> = OnceLock::new();

    fn classifier() -> &'static LineClassifier {
        SHARED_CLASSIFIER.get_or_init(|| LineClassifier::new(Arc::new(PatternSet::compile().unwrap())))
    }

    fn classify<'a>(line: &'a str, state: &mut DialogueState) -> LineRecord<'a> {
        classifier().classify_line(line, state, &mut PunctuationCounts::new())
    }

    #[test]
    fn test_bare_cue_enters_dialogue() {
        let mut state = DialogueState::new();
        let record = classify("HAMLET.\n", &mut state);

        assert_eq!(record.role, LineRole::CharacterName);
        assert_eq!(record.output(), "HAMLET.\n");
        assert!(!record.changed);
        assert!(state.in_dialogue());
    }

    #[test]
    fn test_inline_speech_keeps_speaker_token() {
        let mut state = DialogueState::new();
        let record = classify("Ber. Who's there?\n", &mut state);

        assert_eq!(record.role, LineRole::InlineSpeech);
        assert_eq!(record.speaker, Some("Ber."));
        assert_eq!(record.dialogue, Some("Who's there?"));
        assert_eq!(record.output(), "Ber. Who's there?\n");
        assert!(!record.changed);
        assert!(state.in_dialogue());
    }

    #[test]
    fn test_inline_speech_normalizes_dialogue_only() {
        let mut state = DialogueState { in_dialogue: true };
        let record = classify("  Fran. Nay, answer me: stand, and unfold yourself.\r\n", &mut state);

        assert_eq!(record.role, LineRole::InlineSpeech);
        assert_eq!(record.output(), "  Fran. Nay answer me stand and unfold yourself.\r\n");
        assert!(record.changed);
    }

    #[test]
    fn test_stage_direction_leaves_state_alone() {
        for initial in [false, true] {
            let mut state = DialogueState { in_dialogue: initial };
            let record = classify("[Enter Ghost, armed.]\n", &mut state);
            assert_eq!(record.role, LineRole::StageDirection);
            assert_eq!(record.output(), "[Enter Ghost, armed.]\n");
            assert_eq!(state.in_dialogue(), initial);
        }
    }

    #[test]
    fn test_metadata_ends_dialogue() {
        let headers = [
            "THE TRAGEDY OF HAMLET, PRINCE OF DENMARK",
            "ACT III.",
            "SCENE I. A room in the Castle.",
            "Scene II. Elsinore.",
            "PROLOGUE",
            "EPILOGUE.",
            "CONTENTSANDDRAMATISPERSON",
        ];
        for header in headers {
            let mut state = DialogueState { in_dialogue: true };
            let record = classify(header, &mut state);
            assert_eq!(record.role, LineRole::Metadata, "{header} should be metadata");
            assert_eq!(record.output(), header);
            assert!(!state.in_dialogue());
        }
    }

    #[test]
    fn test_cast_row_only_outside_dialogue() {
        let mut state = DialogueState::new();
        let record = classify("CLAUDIUS, King of Denmark.", &mut state);
        assert_eq!(record.role, LineRole::Metadata);

        let mut state = DialogueState { in_dialogue: true };
        let record = classify("Give me your pardon, sir.", &mut state);
        assert_eq!(record.role, LineRole::DialogueContinuation);
        assert_eq!(record.output(), "Give me your pardon sir.");
    }

    #[test]
    fn test_blank_preserves_state() {
        for initial in [false, true] {
            let mut state = DialogueState { in_dialogue: initial };
            let record = classify("   \n", &mut state);
            assert_eq!(record.role, LineRole::Blank);
            assert_eq!(record.output(), "   \n");
            assert_eq!(state.in_dialogue(), initial);
        }
    }

    #[test]
    fn test_unclassified_outside_dialogue() {
        let mut state = DialogueState::new();
        let record = classify("Produced by the Gutenberg team; thanks to all.\n", &mut state);
        assert_eq!(record.role, LineRole::Unclassified);
        assert_eq!(record.output(), "Produced by the Gutenberg team; thanks to all.\n");
        assert!(!state.in_dialogue());
    }

    #[test]
    fn test_rewrite_scan_summary() {
        let text = "ACT I\n\nHAMLET.\nO, that this too too solid flesh would melt,\n\n[Aside.]\n\nThaw, and resolve itself into a dew!\n";
        let (output, summary) = classifier().rewrite(text);

        assert_eq!(
            output,
            "ACT I\n\nHAMLET.\nO that this too too solid flesh would melt\n\n[Aside.]\n\nThaw and resolve itself into a dew!\n"
        );
        assert_eq!(summary.lines_total, 8);
        assert_eq!(summary.lines_modified, 2);
        assert_eq!(summary.lines_unchanged(), 6);
        assert_eq!(summary.roles.dialogue, 2);
        assert_eq!(summary.lines_spoken, 2);
        assert_eq!(summary.roles.blank, 3);
        assert_eq!(summary.punctuation.commas, 3);
    }
}
