//! Punctuation-driven sentence splitting with a fixed-width fallback for
//! runaway sentences. This is a heuristic, not linguistic boundary detection.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::SentenceSpan;

static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^.!?…]+[.!?…]+|[^.!?…]+$").expect("sentence pattern compiles")
});

const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Splits `text` into trimmed, non-empty sentence strings.
///
/// A trailing run without terminal punctuation is kept as its own sentence.
/// Text that yields no matches at all (for example only punctuation) is
/// returned whole. Blank input yields nothing.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let out: Vec<String> = SENTENCE_RE
        .find_iter(trimmed)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if out.is_empty() {
        vec![trimmed.to_string()]
    } else {
        out
    }
}

/// NFC-composes `text` and drops zero-width characters.
pub fn normalize_for_count(text: &str) -> String {
    text.nfc().filter(|c| !ZERO_WIDTH.contains(c)).collect()
}

/// Visible character count used for wrapping and time weighting.
pub fn char_len(text: &str) -> usize {
    normalize_for_count(text).chars().count()
}

/// Breaks a sentence into `max_line_chars`-wide pieces once it runs past
/// twice that width. Shorter sentences come back as a single piece.
///
/// Output is always normalized (NFC, no zero-width characters), wrapped or not.
pub fn hard_wrap(text: &str, max_line_chars: usize) -> Vec<String> {
    let normalized = normalize_for_count(text);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if max_line_chars == 0 || chars.len() <= max_line_chars * 2 {
        return vec![trimmed.to_string()];
    }

    chars
        .chunks(max_line_chars)
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn segment_scene(text: &str, max_line_chars: usize) -> Vec<SentenceSpan> {
    split_sentences(text)
        .iter()
        .flat_map(|sentence| hard_wrap(sentence, max_line_chars))
        .map(|text| SentenceSpan { text })
        .collect()
}
