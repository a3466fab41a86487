use once_cell::sync::Lazy;
use regex::Regex;

// @module: Script segmentation into sentence-like units

/// Punctuation characters that terminate a script unit.
///
/// Covers ASCII sentence punctuation plus the full-width CJK equivalents,
/// and treats a newline as a hard boundary. The set can be overridden
/// through [`SegmenterConfig`].
pub const DEFAULT_BOUNDARY_CHARS: &str = ".!?;:\u{3002}\u{FF01}\u{FF1F}\u{FF1B}\u{FF1A}\n";

// @const: Bracket characters stripped before synthesis
static BRACKET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\](){}]").unwrap());

/// Configuration for the segmenter
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Characters treated as segment-terminating punctuation
    pub boundary_chars: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        SegmenterConfig {
            boundary_chars: DEFAULT_BOUNDARY_CHARS.to_string(),
        }
    }
}

impl SegmenterConfig {
    /// Create a config with a custom boundary character set
    pub fn with_boundary_chars(chars: &str) -> Self {
        SegmenterConfig {
            boundary_chars: chars.to_string(),
        }
    }
}

/// Normalize a script before synthesis and segmentation.
///
/// Brackets confuse most TTS engines, so they are replaced with spaces
/// and the result is trimmed. Both the synthesis request and the
/// segmenter must see the same normalized text, otherwise the aligner
/// compares against units the engine never spoke.
pub fn format_script(text: &str) -> String {
    BRACKET_REGEX.replace_all(text, " ").trim().to_string()
}

/// Split a script into ordered sentence-like units at punctuation boundaries.
///
/// Each unit keeps its terminating punctuation, is trimmed of surrounding
/// whitespace, and empty units are dropped. The function is pure: the same
/// input always yields the same sequence, in original order. Whitespace-only
/// or empty input yields an empty sequence.
pub fn segment(text: &str, config: &SegmenterConfig) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if config.boundary_chars.contains(ch) {
            let unit = current.trim();
            if !unit.is_empty() && !is_boundary_only(unit, config) {
                units.push(unit.to_string());
            }
            current.clear();
        }
    }

    // Trailing text without a terminating punctuation mark is still a unit
    let tail = current.trim();
    if !tail.is_empty() && !is_boundary_only(tail, config) {
        units.push(tail.to_string());
    }

    units
}

// A chunk consisting solely of boundary punctuation carries no speakable text
fn is_boundary_only(chunk: &str, config: &SegmenterConfig) -> bool {
    chunk.chars().all(|c| config.boundary_chars.contains(c))
}
