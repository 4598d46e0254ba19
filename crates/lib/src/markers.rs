//! # Target-Section Markers
//!
//! Keywords that identify the meeting-notes content inside a rendered or
//! API-extracted document. Matching is case-insensitive and includes the
//! localized synonyms the upstream transcription feature emits.

use regex::Regex;
use std::sync::LazyLock;

pub const SUMMARY_MARKERS: &[&str] = &["ai summary", "summary", "саммари", "резюме", "итоги"];
pub const TRANSCRIPT_MARKERS: &[&str] = &["transcription", "transcript", "транскрипт", "расшифровка"];
pub const MEETING_NOTES_MARKERS: &[&str] = &["meeting notes", "meeting-notes", "заметки встречи"];

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = SUMMARY_MARKERS.iter().chain(TRANSCRIPT_MARKERS.iter());
    build_pattern(keywords)
});

static MEETING_NOTES_RE: LazyLock<Regex> =
    LazyLock::new(|| build_pattern(MEETING_NOTES_MARKERS.iter()));

fn build_pattern<'a>(keywords: impl Iterator<Item = &'a &'a str>) -> Regex {
    let alternation = keywords
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("marker keywords form a valid pattern")
}

/// True if `text` contains a summary or transcript section header.
pub fn has_section_marker(text: &str) -> bool {
    SECTION_RE.is_match(text)
}

/// True if `text` contains the meeting-notes wrapper marker.
pub fn has_meeting_notes_marker(text: &str) -> bool {
    MEETING_NOTES_RE.is_match(text)
}

/// True if `text` contains any target marker at all.
pub fn has_any_marker(text: &str) -> bool {
    has_section_marker(text) || has_meeting_notes_marker(text)
}

/// Slices the target section out of concatenated document text.
///
/// When the meeting-notes wrapper occurs, only the text after its last
/// occurrence is considered (the most recent meeting). The slice starts at the
/// earliest summary/transcript marker in that region and runs to the next
/// markdown heading or the end of the text. The wrapper alone is not a
/// section: without a summary/transcript marker after it the result is `None`.
pub fn extract_section(text: &str) -> Option<String> {
    let wrapper_start = MEETING_NOTES_RE.find_iter(text).last().map(|m| m.start());
    let region = &text[wrapper_start.unwrap_or(0)..];

    let m = SECTION_RE.find(region)?;
    let end = region[m.end()..]
        .find("\n\n#")
        .map(|offset| m.end() + offset)
        .unwrap_or(region.len());

    let slice = region[m.start()..end].trim();
    if slice.is_empty() {
        None
    } else {
        Some(slice.to_string())
    }
}

/// `text` with every marker keyword removed, trimmed of surrounding
/// punctuation and whitespace.
pub fn strip_markers(text: &str) -> String {
    let without_sections = SECTION_RE.replace_all(text, " ");
    let without_wrapper = MEETING_NOTES_RE.replace_all(&without_sections, " ");
    without_wrapper
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}
