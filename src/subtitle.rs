use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Context, Result, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// @module: SubRip rendering, parsing and artifact verification

/// Backend timing resolution: 100-nanosecond ticks
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks per millisecond, the resolution of the SRT wire format
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: 1-based sequence number
    pub seq_num: usize,

    // @field: Start time in backend ticks
    pub start_ticks: i64,

    // @field: End time in backend ticks
    pub end_ticks: i64,

    // @field: Subtitle text, mirrors the authored script unit
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_ticks: i64, end_ticks: i64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_ticks,
            end_ticks,
            text,
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) into backend ticks
    pub fn parse_timestamp(timestamp: &str) -> Result<i64> {
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: i64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: i64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: i64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: i64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
        Ok(total_ms * TICKS_PER_MILLISECOND)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ticks)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ticks)
    }

    /// Format a timestamp in backend ticks to SRT format (HH:MM:SS,mmm).
    /// Sub-millisecond precision is truncated on the wire.
    pub fn format_timestamp(ticks: i64) -> String {
        let ms = ticks.max(0) / TICKS_PER_MILLISECOND;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of subtitle entries ready for rendering
#[derive(Debug, Default)]
pub struct SubtitleDocument {
    /// List of subtitle entries, in emission order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Create a document from an ordered entry list
    pub fn new(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleDocument { entries }
    }

    /// Render the document to SRT text. Rendering the same document twice
    /// yields byte-identical output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
        }
        out
    }

    /// Write the document to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        file.write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Total duration in seconds of a parsed document: the maximum end time
    pub fn total_duration_secs(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_ticks)
            .max()
            .unwrap_or(0)
            .max(0) as f64
            / TICKS_PER_SECOND as f64
    }

    /// Parse an SRT file into a document
    pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_srt_string(&content)
    }

    /// Parse SRT format text into a document
    pub fn parse_srt_string(content: &str) -> Result<Self> {
        let mut entries = Vec::new();

        let mut current_seq_num: Option<usize> = None;
        let mut current_start: Option<i64> = None;
        let mut current_end: Option<i64> = None;
        let mut current_text = String::new();
        let mut line_count = 0;

        let mut finalize = |seq_num: usize, start: i64, end: i64, text: &str| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                warn!("Skipping empty subtitle entry {}", seq_num);
                return;
            }
            entries.push(SubtitleEntry::new(seq_num, start, end, trimmed.to_string()));
        };

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            // A blank line closes the current entry. State resets even when
            // the entry carried no text, so a stale header never swallows
            // the next entry's index and timestamp lines.
            if trimmed.is_empty() {
                if let (Some(seq), Some(start), Some(end)) = (current_seq_num, current_start, current_end) {
                    if !current_text.is_empty() {
                        finalize(seq, start, end, &current_text);
                    } else {
                        warn!("Dropping subtitle entry {} with no text", seq);
                    }
                    current_seq_num = None;
                    current_start = None;
                    current_end = None;
                    current_text.clear();
                }
                continue;
            }

            // Sequence number opens a new entry
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            // Timestamp line follows the sequence number
            if current_seq_num.is_some() && current_start.is_none() && current_end.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    current_start = Some(Self::capture_to_ticks(&caps, 1));
                    current_end = Some(Self::capture_to_ticks(&caps, 5));
                    continue;
                }
            }

            // Anything else is subtitle text once the header is complete
            if current_seq_num.is_some() && current_start.is_some() && current_end.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!(
                    "Unexpected text at line {} before sequence number or timestamp: {}",
                    line_count, trimmed
                );
            }
        }

        // Close the last entry if the file does not end with a blank line
        if let (Some(seq), Some(start), Some(end)) = (current_seq_num, current_start, current_end) {
            if !current_text.is_empty() {
                finalize(seq, start, end, &current_text);
            }
        }

        if entries.is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        Ok(SubtitleDocument { entries })
    }

    /// Extract one timestamp from a regex capture group into ticks
    fn capture_to_ticks(caps: &regex::Captures, start_idx: usize) -> i64 {
        let hours: i64 = caps.get(start_idx).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let minutes: i64 = caps.get(start_idx + 1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let seconds: i64 = caps.get(start_idx + 2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let millis: i64 = caps.get(start_idx + 3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

        ((hours * 3600 + minutes * 60 + seconds) * 1000 + millis) * TICKS_PER_MILLISECOND
    }
}

/// Re-parse a freshly written subtitle file and report its total duration.
///
/// If the artifact does not parse back, it is removed so a corrupt file is
/// never left in place, and the failure is reported as [`SubtitleError::ArtifactCorrupt`].
pub fn verify_artifact<P: AsRef<Path>>(path: P) -> Result<f64, SubtitleError> {
    let path = path.as_ref();
    match SubtitleDocument::parse_srt_file(path) {
        Ok(doc) => Ok(doc.total_duration_secs()),
        Err(e) => {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
            Err(SubtitleError::ArtifactCorrupt(format!(
                "{}: {}",
                path.display(),
                e
            )))
        }
    }
}
