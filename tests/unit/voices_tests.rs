/*!
 * Tests for the voice catalog and voice-name utilities
 */

use voxalign::voices::{all_voices, is_azure_v2, parse_voice_name, rate_to_percent, strip_v2_suffix};

/// Test listing with the default locale filter
#[test]
fn test_all_voices_withDefaultFilter_shouldBeSortedAndDecorated() {
    let voices = all_voices(None);

    assert!(!voices.is_empty());
    let mut sorted = voices.clone();
    sorted.sort();
    assert_eq!(voices, sorted);
    assert!(voices.iter().all(|v| v.ends_with("-Female") || v.ends_with("-Male")));
    assert!(voices.iter().any(|v| v.starts_with("en-US-")));
    assert!(voices.iter().any(|v| v.starts_with("zh-CN-")));
}

/// Test locale filtering
#[test]
fn test_all_voices_withLocaleFilter_shouldOnlyListThatLocale() {
    let voices = all_voices(Some(&["fr-FR"]));

    assert!(!voices.is_empty());
    assert!(voices.iter().all(|v| v.starts_with("fr-FR-")));
}

/// Test that an empty filter lists the whole catalog
#[test]
fn test_all_voices_withEmptyFilter_shouldListEverything() {
    let all = all_voices(Some(&[]));
    let filtered = all_voices(None);

    assert!(all.len() > filtered.len());
}

/// Test stripping catalog gender decorations
#[test]
fn test_parse_voice_name_withDecorations_shouldStripThem() {
    assert_eq!(parse_voice_name("en-US-JennyNeural-Female"), "en-US-JennyNeural");
    assert_eq!(parse_voice_name("en-US-GuyNeural-Male"), "en-US-GuyNeural");
    assert_eq!(parse_voice_name("  en-US-AriaNeural  "), "en-US-AriaNeural");
}

/// Test Azure -V2 suffix handling
#[test]
fn test_v2_suffix_withAndWithoutSuffix_shouldDetectAndStrip() {
    assert!(is_azure_v2("en-US-AvaMultilingualNeural-V2"));
    assert!(!is_azure_v2("en-US-AvaNeural"));
    assert_eq!(strip_v2_suffix("en-US-AvaMultilingualNeural-V2"), "en-US-AvaMultilingualNeural");
    assert_eq!(strip_v2_suffix("en-US-AvaNeural"), "en-US-AvaNeural");
}

/// Test rate formatting across the sign boundary
#[test]
fn test_rate_to_percent_withVariousRates_shouldFormatSignedPercent() {
    assert_eq!(rate_to_percent(1.0), "+0%");
    assert_eq!(rate_to_percent(1.2), "+20%");
    assert_eq!(rate_to_percent(0.85), "-15%");
    assert_eq!(rate_to_percent(2.0), "+100%");
}
