// WHY: Strips reading punctuation from spoken lines so verse reads as continuous speech
// Periods, apostrophes and question marks always survive; removed marks become spaces
// An exclamation mark survives only as the line-final mark

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Line-final marks that are kept even though they are stripped everywhere else
const TRAILING_MARKS: &[&str] = &["--", "!", ";", ":", "\u{2014}", "\u{2013}"];

/// Running tally of removed punctuation, counted on the untransformed input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunctuationCounts {
    pub commas: usize,
    pub semicolons: usize,
    pub colons: usize,
    pub quotes: usize,
    /// Hyphens, en dashes and em dashes together
    pub dashes: usize,
}

impl PunctuationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw occurrences found in `text`
    pub fn tally(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                ',' => self.commas += 1,
                ';' => self.semicolons += 1,
                ':' => self.colons += 1,
                '"' | '\u{201C}' | '\u{201D}' => self.quotes += 1,
                '-' | '\u{2013}' | '\u{2014}' => self.dashes += 1,
                _ => {}
            }
        }
    }

    pub fn total(&self) -> usize {
        self.commas + self.semicolons + self.colons + self.quotes + self.dashes
    }
}

impl AddAssign for PunctuationCounts {
    fn add_assign(&mut self, other: Self) {
        self.commas += other.commas;
        self.semicolons += other.semicolons;
        self.colons += other.colons;
        self.quotes += other.quotes;
        self.dashes += other.dashes;
    }
}

/// Characters replaced by a space during normalization
pub fn is_removable(ch: char) -> bool {
    matches!(
        ch,
        ',' | ';' | ':' | '!' | '"' | '\u{201C}' | '\u{201D}' | '-' | '\u{2013}' | '\u{2014}'
    )
}

fn trailing_mark(content: &str) -> Option<&'static str> {
    TRAILING_MARKS.iter().copied().find(|mark| content.ends_with(mark))
}

/// Normalize dialogue text with a new allocation.
/// Returns the transformed text and whether it differs from the input.
pub fn normalize_dialogue(text: &str, counts: &mut PunctuationCounts) -> (String, bool) {
    let mut result = String::with_capacity(text.len());
    let changed = normalize_dialogue_into(text, counts, &mut result);
    (result, changed)
}

/// Normalize dialogue text into a supplied buffer.
///
/// Leading indentation and the trailing whitespace/newline bytes are carried over
/// verbatim. Between them, removable marks become spaces and space runs collapse.
/// A line ending in `!`, `;`, `:`, `--`, em dash or en dash keeps that one mark.
pub fn normalize_dialogue_into(text: &str, counts: &mut PunctuationCounts, buffer: &mut String) -> bool {
    buffer.clear();
    buffer.reserve(text.len());
    counts.tally(text);

    let body = text.trim_end();
    let line_ending = &text[body.len()..];
    let content = body.trim_start();
    let indentation = &body[..body.len() - content.len()];
    let mark = trailing_mark(content);

    buffer.push_str(indentation);
    let content_start = buffer.len();
    let mut prev_was_space = false;

    for ch in content.chars() {
        let ch = if is_removable(ch) { ' ' } else { ch };
        if ch == ' ' {
            // Skip leading spaces and collapse runs
            if prev_was_space || buffer.len() == content_start {
                continue;
            }
            prev_was_space = true;
        } else {
            prev_was_space = false;
        }
        buffer.push(ch);
    }

    let kept = buffer[content_start..].trim_end().len();
    buffer.truncate(content_start + kept);

    if let Some(mark) = mark {
        if !buffer[content_start..].ends_with(mark) {
            buffer.push_str(mark);
        }
    }

    buffer.push_str(line_ending);
    buffer.as_str() != text
}
