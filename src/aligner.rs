use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AlignError;
use crate::subtitle::{SubtitleEntry, TICKS_PER_SECOND};

// @module: Fragment-to-script alignment

// @const: Strips punctuation but keeps whitespace (tier 2)
static PUNCT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

// @const: Strips every non-word run, whitespace included (tier 3)
static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Start-time sentinel: no fragment of the current unit has arrived yet
const UNSET_START: i64 = -1;

/// One timed word-boundary event from a speech backend.
///
/// Times are a half-open interval `[start, end)` in 100-nanosecond ticks.
/// The text payload must already be entity-unescaped; that happens at the
/// backend boundary, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFragment {
    /// Start of the interval in ticks
    pub start_ticks: i64,
    /// End of the interval in ticks
    pub end_ticks: i64,
    /// Spoken text covered by the interval
    pub text: String,
}

impl TimedFragment {
    /// Create a fragment from explicit tick values
    pub fn new(start_ticks: i64, end_ticks: i64, text: impl Into<String>) -> Self {
        TimedFragment {
            start_ticks,
            end_ticks,
            text: text.into(),
        }
    }
}

// @struct: Mutable accumulator for the unit currently being matched
#[derive(Debug)]
struct PendingBuffer {
    // @field: Start of the first fragment of the current unit, -1 until set
    start_ticks: i64,
    // @field: Concatenated fragment text, no separator inserted
    text: String,
}

impl PendingBuffer {
    fn new() -> Self {
        PendingBuffer {
            start_ticks: UNSET_START,
            text: String::new(),
        }
    }

    fn reset(&mut self) {
        self.start_ticks = UNSET_START;
        self.text.clear();
    }
}

/// Successful alignment: one subtitle entry per script unit, in order,
/// plus the end time of the last fragment the backend ever produced.
#[derive(Debug)]
pub struct AlignmentReport {
    /// Emitted entries, 1-indexed, length equals the script unit count
    pub entries: Vec<SubtitleEntry>,
    /// End tick of the final fragment in the stream, including trailing
    /// fragments that were ignored after the last unit matched
    pub last_observed_end_ticks: i64,
}

impl AlignmentReport {
    /// Narrated audio duration in seconds, derived from the last fragment
    /// ever observed rather than the last emitted entry. Zero when the
    /// stream was empty.
    pub fn duration_secs(&self) -> f64 {
        if self.last_observed_end_ticks <= 0 {
            return 0.0;
        }
        self.last_observed_end_ticks as f64 / TICKS_PER_SECOND as f64
    }
}

/// Match the accumulated buffer against the expected unit.
///
/// Three comparators are tried in a fixed order, first success wins:
/// 1. verbatim equality, emitting the unit text;
/// 2. punctuation-insensitive equality (strip `[^\w\s]` from both sides),
///    emitting the unit's stripped form;
/// 3. whitespace-and-punctuation-insensitive equality (strip `\W+` runs),
///    emitting the unit's original text.
///
/// TTS engines re-tokenize and normalize punctuation relative to the source
/// script, so verbatim matching alone drops nearly every line. The tiers
/// trade precision for recall in an auditable order and never guess past
/// ambiguity: on no match the caller keeps accumulating.
///
/// A tier that fires but yields empty text counts as no match: a unit made
/// of punctuation alone strips to nothing under tier 2, and emitting an
/// empty subtitle entry for it would let any stray punctuation fragment
/// consume the unit.
fn match_unit(buffer: &str, unit: &str) -> Option<String> {
    if buffer == unit {
        return non_empty(unit.trim());
    }

    let buffer_no_punct = PUNCT_REGEX.replace_all(buffer, "");
    let unit_no_punct = PUNCT_REGEX.replace_all(unit, "");
    if buffer_no_punct == unit_no_punct {
        return non_empty(unit_no_punct.trim());
    }

    let buffer_words = NON_WORD_REGEX.replace_all(buffer, "");
    let unit_words = NON_WORD_REGEX.replace_all(unit, "");
    if buffer_words == unit_words {
        return non_empty(unit.trim());
    }

    None
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Align a fully materialized fragment stream against the segmented script.
///
/// Single forward pass: fragments are concatenated into a pending buffer
/// until the buffer matches the next expected unit, at which point one
/// [`SubtitleEntry`] is emitted with the buffer's start time and the current
/// fragment's end time, and the buffer resets. Once every unit has matched,
/// remaining fragments are ignored for matching but still count toward the
/// observed stream end.
///
/// Returns [`AlignError::Incomplete`] when the pass ends with fewer entries
/// than units; no partial entry list ever escapes.
pub fn align(fragments: &[TimedFragment], units: &[String]) -> Result<AlignmentReport, AlignError> {
    let last_observed_end_ticks = fragments.last().map(|f| f.end_ticks).unwrap_or(0);

    let mut entries: Vec<SubtitleEntry> = Vec::with_capacity(units.len());
    let mut buffer = PendingBuffer::new();
    let mut unit_index = 0;

    for fragment in fragments {
        if unit_index >= units.len() {
            // Content past the expected script still counts toward duration
            debug!("Ignoring trailing fragment past the last script unit: {:?}", fragment.text);
            continue;
        }

        if buffer.start_ticks == UNSET_START {
            buffer.start_ticks = fragment.start_ticks;
        }
        buffer.text.push_str(&fragment.text);

        if let Some(matched_text) = match_unit(&buffer.text, &units[unit_index]) {
            entries.push(SubtitleEntry::new(
                entries.len() + 1,
                buffer.start_ticks,
                fragment.end_ticks,
                matched_text,
            ));
            buffer.reset();
            unit_index += 1;
        }
    }

    if entries.len() == units.len() {
        Ok(AlignmentReport {
            entries,
            last_observed_end_ticks,
        })
    } else {
        warn!(
            "Alignment drifted: {} entries emitted for {} script units",
            entries.len(),
            units.len()
        );
        Err(AlignError::Incomplete {
            emitted: entries.len(),
            expected: units.len(),
        })
    }
}
