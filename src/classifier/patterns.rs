// WHY: Line-shape patterns shared by feature extraction and the dialogue state machine
// Compiled once per process and handed around behind an Arc

use anyhow::Result;
use regex_automata::meta::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Prefixes that mark a section header rather than a speaker cue
pub const SECTION_HEADER_PREFIXES: &[&str] = &["ACT ", "SCENE", "Scene "];

/// Prefixes that mark a header, title or framing line
pub const METADATA_PREFIXES: &[&str] = &["ACT ", "SCENE", "Scene ", "PROLOGUE", "EPILOGUE"];

/// Substrings found in cast-list headings ("Persons Represented", "DRAMATIS PERSONAE")
pub const CAST_LIST_MARKERS: &[&str] = &["Persons", "Represented", "DRAMATIS"];

/// Closed set of section numerals recognised as sonnet/canto markers.
/// Anything outside this list (or written non-canonically) is not a marker.
pub const ROMAN_NUMERAL_MARKERS: &[&str] = &[
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X",
    "XI", "XII", "XIII", "XIV", "XV", "XVI", "XVII", "XVIII", "XIX", "XX",
    "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC", "C", "CL", "CLIV",
];

/// Longest trimmed line (in characters) still accepted as a speaker cue
pub const MAX_CUE_LENGTH: usize = 30;

/// Compiled line patterns
pub struct PatternSet {
    stage_direction: Regex,
    character_cue: Regex,
    inline_speech: Regex,
    quoted_dialogue: Regex,
    narrator_tag: Regex,
    roman_numerals: HashSet<&'static str>,
}

/// Byte offsets of the pieces of an inline speech line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineSpeechSplit {
    /// Start of the speaker token (after any indentation)
    pub speaker_start: usize,
    /// End of the speaker token, just past its period
    pub speaker_end: usize,
    /// Start of the dialogue text
    pub dialogue_start: usize,
}

impl PatternSet {
    pub fn compile() -> Result<Self> {
        // Compositional pattern components
        let capitalized_word = r"[A-Z][A-Za-z]*";
        let speaker_token = format!(r"{capitalized_word}(?: {capitalized_word})*\.");
        let indentation = r"[ \t]*";

        let stage_direction = r"^\[.*\]$";
        let character_cue = r"^[A-Z][A-Za-z ]*\.?$";
        let inline_speech = format!(r"^{indentation}({speaker_token})[ ]+(\S.{{2,}})$");
        let quoted_dialogue = r"^\s*'[A-Z]";
        let narrator_tag = r"(?i)\bquoth\b|\bthus\s+(?:she|he)\b";

        let patterns = Self {
            stage_direction: Regex::new(stage_direction)?,
            character_cue: Regex::new(character_cue)?,
            inline_speech: Regex::new(&inline_speech)?,
            quoted_dialogue: Regex::new(quoted_dialogue)?,
            narrator_tag: Regex::new(narrator_tag)?,
            roman_numerals: ROMAN_NUMERAL_MARKERS.iter().copied().collect(),
        };

        debug!("Compiled line patterns ({} roman numeral markers)", patterns.roman_numerals.len());
        Ok(patterns)
    }

    /// Whole trimmed line enclosed in square brackets
    pub fn is_stage_direction(&self, trimmed: &str) -> bool {
        self.stage_direction.is_match(trimmed)
    }

    /// Bare speaker cue such as `HAMLET.` or `First Clown.`
    pub fn is_character_cue(&self, trimmed: &str) -> bool {
        self.character_cue.is_match(trimmed)
            && trimmed.chars().count() <= MAX_CUE_LENGTH
            && !starts_with_any(trimmed, SECTION_HEADER_PREFIXES)
            && !contains_any(trimmed, CAST_LIST_MARKERS)
            && !self.is_roman_numeral(trimmed)
    }

    /// Raw line opening with a single-quoted capitalised utterance
    pub fn is_quoted_dialogue(&self, raw: &str) -> bool {
        self.quoted_dialogue.is_match(raw)
    }

    pub fn has_narrator_tag(&self, line: &str) -> bool {
        self.narrator_tag.is_match(line)
    }

    pub fn is_roman_numeral(&self, trimmed: &str) -> bool {
        self.roman_numerals.contains(trimmed)
    }

    /// Split `Ber. Who's there?` into speaker token and dialogue text.
    /// `content` must already have its line ending removed.
    pub fn split_inline_speech(&self, content: &str) -> Option<InlineSpeechSplit> {
        let mut caps = self.inline_speech.create_captures();
        self.inline_speech.captures(content, &mut caps);
        let speaker = caps.get_group(1)?;
        let dialogue = caps.get_group(2)?;

        let token = &content[speaker.start..speaker.end];
        if token.chars().count() > MAX_CUE_LENGTH || starts_with_any(token, SECTION_HEADER_PREFIXES) {
            return None;
        }

        Some(InlineSpeechSplit {
            speaker_start: speaker.start,
            speaker_end: speaker.end,
            dialogue_start: dialogue.start,
        })
    }
}

pub fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| text.starts_with(prefix))
}

pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// True when the text has at least one cased letter and no lowercase letters
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
