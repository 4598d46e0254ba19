//! # Section Marker Tests

use minutes::markers::{
    extract_section, has_any_marker, has_meeting_notes_marker, has_section_marker, strip_markers,
};

#[test]
fn test_markers_match_case_insensitively() {
    assert!(has_section_marker("## AI SUMMARY"));
    assert!(has_section_marker("Transcript follows"));
    assert!(has_section_marker("Итоги встречи"));
    assert!(has_meeting_notes_marker("Meeting Notes: weekly sync"));
    assert!(!has_any_marker("Agenda\n\nBudget review"));
}

#[test]
fn test_extract_section_runs_to_next_heading() {
    let text = "Agenda\n\n## Summary\n\nWe agreed to ship.\n\n# Appendix\n\nIgnored";
    let section = extract_section(text).expect("section present");
    assert_eq!(section, "Summary\n\nWe agreed to ship.");
}

#[test]
fn test_extract_section_prefers_last_meeting_notes_wrapper() {
    let text = "Meeting notes\n\nSummary: old meeting\n\nMeeting notes\n\nTranscript: new meeting";
    let section = extract_section(text).expect("section present");
    assert_eq!(section, "Transcript: new meeting");
}

#[test]
fn test_wrapper_without_nested_section_is_not_a_section() {
    assert_eq!(extract_section("# Meeting notes\n\nAttendees: Anna"), None);
    assert_eq!(
        extract_section("Intro\n\nMeeting notes\n\nDana will send the report."),
        None
    );
}

#[test]
fn test_section_before_last_wrapper_is_ignored() {
    let text = "Summary: old meeting\n\nMeeting notes\n\nAttendees: Anna";
    assert_eq!(extract_section(text), None);
}

#[test]
fn test_strip_markers_leaves_only_the_body() {
    assert_eq!(strip_markers("AI Summary:"), "");
    assert_eq!(strip_markers("## Meeting notes - March 3"), "March 3");
    assert_eq!(
        strip_markers("Transcript\nAlex: we ship on Tuesday"),
        "Alex: we ship on Tuesday"
    );
}

#[test]
fn test_no_marker_yields_none() {
    assert_eq!(extract_section("Just an agenda with no notes."), None);
}
