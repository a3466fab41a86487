/*!
 * Tests for fragment-to-script alignment
 */

use voxalign::aligner::{TimedFragment, align};
use voxalign::errors::AlignError;
use crate::common::{fragments, units};

/// Round-trip: fragments carrying each unit's exact text match tier 1,
/// producing one entry per unit in order with 1-based indices
#[test]
fn test_align_withExactFragments_shouldEmitOneEntryPerUnit() {
    let script_units = units(&["Hi there.", "How are you?"]);
    let stream = fragments(&[
        (0, 9_000_000, "Hi there."),
        (9_000_000, 14_000_000, "How are you?"),
    ]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].seq_num, 1);
    assert_eq!(report.entries[0].text, "Hi there.");
    assert_eq!(report.entries[1].seq_num, 2);
    assert_eq!(report.entries[1].text, "How are you?");
}

/// The reference scenario: sub-unit fragments accumulate until the unit
/// matches, and the entry spans first fragment start to last fragment end
#[test]
fn test_align_withSplitFragments_shouldAccumulateAndTimeFromBufferStart() {
    let script_units = units(&["Hi there.", "How are you?"]);
    let stream = fragments(&[
        (0, 5_000_000, "Hi"),
        (5_000_000, 9_000_000, " there."),
        (9_000_000, 14_000_000, "How are you?"),
    ]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].start_ticks, 0);
    assert_eq!(report.entries[0].end_ticks, 9_000_000);
    assert_eq!(report.entries[0].text, "Hi there.");
    assert_eq!(report.entries[1].start_ticks, 9_000_000);
    assert_eq!(report.entries[1].end_ticks, 14_000_000);
    assert_eq!(report.entries[1].text, "How are you?");
    assert!((report.duration_secs() - 1.4).abs() < 1e-9);
}

/// Tier 2: inserted punctuation in the spoken stream still matches, and the
/// emitted text is the unit's punctuation-stripped form
#[test]
fn test_align_withExtraPunctuation_shouldMatchPunctuationInsensitive() {
    let script_units = units(&["Hello world"]);
    let stream = fragments(&[(0, 10_000_000, "Hello, world!")]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].text, "Hello world");
}

/// Tier 3: altered spacing matches, and the emitted text is the unit's
/// original text
#[test]
fn test_align_withAlteredSpacing_shouldEmitOriginalUnitText() {
    let script_units = units(&["Hello world."]);
    let stream = fragments(&[(0, 5_000_000, "Hello"), (5_000_000, 10_000_000, "world.")]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].text, "Hello world.");
}

/// Truncated streams never produce a partial result
#[test]
fn test_align_withTruncatedFragments_shouldFailWithBothCounts() {
    let script_units = units(&["Hi there.", "How are you?"]);
    let stream = fragments(&[(0, 9_000_000, "Hi there.")]);

    let err = align(&stream, &script_units).unwrap_err();

    match err {
        AlignError::Incomplete { emitted, expected } => {
            assert_eq!(emitted, 1);
            assert_eq!(expected, 2);
        }
    }
}

/// Drifted streams that never match any unit also fail with counts
#[test]
fn test_align_withUnmatchableFragments_shouldFailWithZeroEmitted() {
    let script_units = units(&["Expected line."]);
    let stream = fragments(&[(0, 5_000_000, "something"), (5_000_000, 9_000_000, "else entirely")]);

    let err = align(&stream, &script_units).unwrap_err();

    match err {
        AlignError::Incomplete { emitted, expected } => {
            assert_eq!(emitted, 0);
            assert_eq!(expected, 1);
        }
    }
}

/// Fragments past the final unit are ignored for matching but still count
/// toward the observed stream end
#[test]
fn test_align_withTrailingFragments_shouldIgnoreThemButTrackDuration() {
    let script_units = units(&["Only unit."]);
    let stream = fragments(&[
        (0, 9_000_000, "Only unit."),
        (9_000_000, 20_000_000, "trailing noise"),
    ]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].end_ticks, 9_000_000);
    assert_eq!(report.last_observed_end_ticks, 20_000_000);
    assert!((report.duration_secs() - 2.0).abs() < 1e-9);
}

/// Empty fragment stream against a non-empty script fails; duration is zero
#[test]
fn test_align_withNoFragments_shouldFailAndReportZeroDuration() {
    let script_units = units(&["A unit."]);
    let stream: Vec<TimedFragment> = Vec::new();

    let err = align(&stream, &script_units).unwrap_err();
    match err {
        AlignError::Incomplete { emitted, expected } => {
            assert_eq!(emitted, 0);
            assert_eq!(expected, 1);
        }
    }
}

/// A unit consisting only of punctuation strips to empty text under the
/// fuzzy tiers; it must never match, so the pass ends incomplete instead
/// of emitting an entry with empty text
#[test]
fn test_align_withPunctuationOnlyUnit_shouldFailInsteadOfEmittingEmptyEntry() {
    let script_units = units(&[",.", "Bye."]);
    let stream = fragments(&[(0, 1_000_000, ","), (1_000_000, 2_000_000, "Bye.")]);

    let err = align(&stream, &script_units).unwrap_err();

    match err {
        AlignError::Incomplete { emitted, expected } => {
            assert_eq!(emitted, 0);
            assert_eq!(expected, 2);
        }
    }
}

/// Empty unit list with an empty stream succeeds with no entries
#[test]
fn test_align_withNoUnitsAndNoFragments_shouldSucceedEmpty() {
    let report = align(&[], &[]).unwrap();

    assert!(report.entries.is_empty());
    assert_eq!(report.duration_secs(), 0.0);
}

/// Concatenation across fragment boundaries inserts no separator: engines
/// that drop inter-word whitespace only match through tier 3
#[test]
fn test_align_withUnspacedWordFragments_shouldMatchThroughTierThree() {
    let script_units = units(&["How are you?"]);
    let stream = fragments(&[
        (0, 3_000_000, "How"),
        (3_000_000, 6_000_000, "are"),
        (6_000_000, 9_000_000, "you?"),
    ]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].text, "How are you?");
    assert_eq!(report.entries[0].start_ticks, 0);
    assert_eq!(report.entries[0].end_ticks, 9_000_000);
}

/// Unicode scripts flow through the word-character semantics of the tiers:
/// the spoken stream drops the full-width stop, so tier 2 fires and emits
/// the unit's punctuation-stripped form
#[test]
fn test_align_withUnicodeText_shouldMatchPunctuationInsensitive() {
    let script_units = units(&["你好。"]);
    let stream = fragments(&[(0, 5_000_000, "你好")]);

    let report = align(&stream, &script_units).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].text, "你好");
}
