/*!
 * Tests for SRT rendering, parsing and artifact verification
 */

use anyhow::Result;
use voxalign::errors::SubtitleError;
use voxalign::subtitle::{self, SubtitleDocument, SubtitleEntry, TICKS_PER_MILLISECOND};
use crate::common;

/// Test timestamp parsing and formatting round-trip
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ticks = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ticks, 5_025_678 * TICKS_PER_MILLISECOND);

    let formatted = SubtitleEntry::format_timestamp(ticks);
    assert_eq!(formatted, ts);
}

/// Test rejection of malformed timestamps
#[test]
fn test_timestamp_parsing_withInvalidComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:00").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
}

/// Test the SRT block layout of a single entry
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldRenderSrtBlock() {
    let entry = SubtitleEntry::new(1, 0, 9_000_000, "Hi there.".to_string());
    let block = entry.to_string();

    assert_eq!(block, "1\n00:00:00,000 --> 00:00:00,900\nHi there.\n\n");
}

/// Test the comma millisecond separator on the wire
#[test]
fn test_subtitle_entry_display_withMillis_shouldUseCommaSeparator() {
    let entry = SubtitleEntry::new(3, 61_234 * TICKS_PER_MILLISECOND, 65_432 * TICKS_PER_MILLISECOND, "x".to_string());

    assert_eq!(entry.format_start_time(), "00:01:01,234");
    assert_eq!(entry.format_end_time(), "00:01:05,432");
    assert!(!entry.to_string().contains("01.234"));
}

/// Test rendering idempotence: same document, byte-identical output
#[test]
fn test_render_calledTwice_shouldBeByteIdentical() {
    let doc = SubtitleDocument::new(vec![
        SubtitleEntry::new(1, 0, 9_000_000, "Hi there.".to_string()),
        SubtitleEntry::new(2, 9_000_000, 14_000_000, "How are you?".to_string()),
    ]);

    assert_eq!(doc.render(), doc.render());
}

/// Test that rendered output ends with a trailing newline
#[test]
fn test_render_withEntries_shouldEndWithTrailingNewline() {
    let doc = SubtitleDocument::new(vec![SubtitleEntry::new(1, 0, 9_000_000, "Hi.".to_string())]);

    assert!(doc.render().ends_with('\n'));
}

/// Test write-then-parse round trip through a real file
#[test]
fn test_write_and_parse_withValidDocument_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("narration.srt");

    let doc = SubtitleDocument::new(vec![
        SubtitleEntry::new(1, 0, 9_000_000, "Hi there.".to_string()),
        SubtitleEntry::new(2, 9_000_000, 14_000_000, "How are you?".to_string()),
    ]);
    doc.write_to_srt(&path)?;

    let parsed = SubtitleDocument::parse_srt_file(&path)?;
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].text, "Hi there.");
    assert_eq!(parsed.entries[0].start_ticks, 0);
    assert_eq!(parsed.entries[1].text, "How are you?");
    assert_eq!(parsed.entries[1].end_ticks, 14_000_000);

    Ok(())
}

/// Test total duration of a parsed document
#[test]
fn test_total_duration_withEntries_shouldReportMaxEnd() {
    let doc = SubtitleDocument::new(vec![
        SubtitleEntry::new(1, 0, 9_000_000, "a".to_string()),
        SubtitleEntry::new(2, 9_000_000, 14_000_000, "b".to_string()),
    ]);

    assert!((doc.total_duration_secs() - 1.4).abs() < 1e-9);
    assert_eq!(SubtitleDocument::default().total_duration_secs(), 0.0);
}

/// Test parsing of multi-line subtitle text
#[test]
fn test_parse_srt_string_withMultilineText_shouldKeepBothLines() -> Result<()> {
    let content = "1\n00:00:00,000 --> 00:00:02,000\nfirst line\nsecond line\n\n";
    let doc = SubtitleDocument::parse_srt_string(content)?;

    assert_eq!(doc.entries.len(), 1);
    assert_eq!(doc.entries[0].text, "first line\nsecond line");
    Ok(())
}

/// Test that an entry with a header but no text is dropped and does not
/// swallow the following entry
#[test]
fn test_parse_srt_string_withTextlessEntry_shouldRecoverOnNextEntry() -> Result<()> {
    let content = "1\n00:00:00,000 --> 00:00:01,000\n\n2\n00:00:01,000 --> 00:00:02,000\nHello\n\n";
    let doc = SubtitleDocument::parse_srt_string(content)?;

    assert_eq!(doc.entries.len(), 1);
    assert_eq!(doc.entries[0].seq_num, 2);
    assert_eq!(doc.entries[0].text, "Hello");
    Ok(())
}

/// Test that garbage content fails to parse
#[test]
fn test_parse_srt_string_withGarbage_shouldFail() {
    assert!(SubtitleDocument::parse_srt_string("not a subtitle file").is_err());
    assert!(SubtitleDocument::parse_srt_string("").is_err());
}

/// Test artifact verification of a healthy file
#[test]
fn test_verify_artifact_withValidFile_shouldReportDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("ok.srt");
    let doc = SubtitleDocument::new(vec![SubtitleEntry::new(1, 0, 14_000_000, "Hi.".to_string())]);
    doc.write_to_srt(&path)?;

    let duration = subtitle::verify_artifact(&path).unwrap();
    assert!((duration - 1.4).abs() < 1e-9);
    assert!(path.exists());

    Ok(())
}

/// Test that a corrupt artifact is removed and reported
#[test]
fn test_verify_artifact_withCorruptFile_shouldRemoveIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let path = common::create_test_file(&dir, "broken.srt", "totally not subtitles")?;

    let err = subtitle::verify_artifact(&path).unwrap_err();
    assert!(matches!(err, SubtitleError::ArtifactCorrupt(_)));
    assert!(!path.exists(), "corrupt artifact must be removed");

    Ok(())
}
