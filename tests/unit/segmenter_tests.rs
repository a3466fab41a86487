/*!
 * Tests for script segmentation
 */

use voxalign::segmenter::{SegmenterConfig, format_script, segment};

/// Test basic sentence splitting on ASCII punctuation
#[test]
fn test_segment_withAsciiSentences_shouldProduceOneUnitPerSentence() {
    let config = SegmenterConfig::default();
    let units = segment("First sentence. Second one! And a third?", &config);

    assert_eq!(units, vec!["First sentence.", "Second one!", "And a third?"]);
}

/// Test that order is preserved and no empty units are produced
#[test]
fn test_segment_withManySentences_shouldPreserveOrderWithoutEmptyUnits() {
    let config = SegmenterConfig::default();
    let text = "One. Two. Three. Four. Five.";
    let units = segment(text, &config);

    assert_eq!(units.len(), 5);
    for unit in &units {
        assert!(!unit.trim().is_empty());
    }
    assert_eq!(units[0], "One.");
    assert_eq!(units[4], "Five.");
}

/// Test determinism: the same input always yields the same sequence
#[test]
fn test_segment_withSameInput_shouldBeDeterministic() {
    let config = SegmenterConfig::default();
    let text = "Hi there. How are you?";

    assert_eq!(segment(text, &config), segment(text, &config));
}

/// Test empty and whitespace-only input
#[test]
fn test_segment_withBlankInput_shouldYieldEmptySequence() {
    let config = SegmenterConfig::default();

    assert!(segment("", &config).is_empty());
    assert!(segment("  \t \n ", &config).is_empty());
    assert!(segment("...", &config).is_empty());
}

/// Test CJK full-width punctuation boundaries
#[test]
fn test_segment_withCjkPunctuation_shouldSplitOnFullWidthMarks() {
    let config = SegmenterConfig::default();
    let units = segment("你好。谢谢！", &config);

    assert_eq!(units, vec!["你好。", "谢谢！"]);
}

/// Test newline as a hard boundary
#[test]
fn test_segment_withNewlines_shouldTreatThemAsBoundaries() {
    let config = SegmenterConfig::default();
    let units = segment("line one\nline two", &config);

    assert_eq!(units, vec!["line one", "line two"]);
}

/// Test trailing text without terminating punctuation
#[test]
fn test_segment_withUnterminatedTail_shouldKeepTailAsUnit() {
    let config = SegmenterConfig::default();
    let units = segment("Done. And then", &config);

    assert_eq!(units, vec!["Done.", "And then"]);
}

/// Test a custom boundary character set
#[test]
fn test_segment_withCustomBoundaries_shouldOnlySplitOnConfiguredChars() {
    let config = SegmenterConfig::with_boundary_chars("|");
    let units = segment("a.b|c.d", &config);

    assert_eq!(units, vec!["a.b|", "c.d"]);
}

/// Test bracket normalization before synthesis
#[test]
fn test_format_script_withBrackets_shouldStripThem() {
    let formatted = format_script("{note} Hello [aside] world (quietly)");

    assert!(!formatted.contains('['));
    assert!(!formatted.contains('('));
    assert!(!formatted.contains('{'));
    assert!(formatted.starts_with("note"));
}

/// Test that formatting is idempotent
#[test]
fn test_format_script_appliedTwice_shouldBeIdempotent() {
    let once = format_script("[a] b (c)");
    let twice = format_script(&once);

    assert_eq!(once, twice);
}
