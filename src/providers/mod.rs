/*!
 * Speech synthesis backend implementations.
 *
 * This module contains client implementations for the supported speech
 * synthesis services:
 * - Edge: edge-tts gateway (no API key required)
 * - Azure: Azure Cognitive Services speech endpoint
 *
 * A backend turns a script into audio bytes plus an ordered stream of timed
 * word-boundary fragments. Everything time-ordered and entity-unescaped
 * leaves this module; the aligner performs no I/O and no unescaping.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::fs;
use std::path::Path;

use crate::aligner::TimedFragment;
use crate::errors::BackendError;

/// Result of one synthesis call: the encoded audio and the ordered
/// word-boundary fragment stream covering it
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Encoded audio bytes as delivered by the backend
    pub audio: Vec<u8>,
    /// Timed fragments, ordered by emission, text already unescaped
    pub fragments: Vec<TimedFragment>,
}

/// Common trait for all speech synthesis backends
///
/// The aligner depends only on this seam, never on a specific provider.
/// `synthesize` may suspend on network I/O; alignment itself stays pure.
#[async_trait]
pub trait SpeechBackend: Send + Sync + Debug {
    /// Synthesize narration for a script with the given voice and rate
    ///
    /// # Arguments
    /// * `text` - The normalized script text to narrate
    /// * `voice` - Bare neural voice name, catalog decorations stripped
    /// * `rate` - Speaking-rate multiplier, 1.0 is normal speed
    ///
    /// # Returns
    /// * `Result<Synthesis, BackendError>` - Audio plus fragments, or an error
    async fn synthesize(&self, text: &str, voice: &str, rate: f32) -> Result<Synthesis, BackendError>;

    /// Write the synthesized audio to a file
    fn write_audio(&self, synthesis: &Synthesis, path: &Path) -> Result<(), BackendError> {
        fs::write(path, &synthesis.audio)
            .map_err(|e| BackendError::RequestFailed(format!("Failed to write audio file: {}", e)))
    }
}

/// Exponential backoff delay in milliseconds for a retry attempt.
/// The exponent is capped and the multiply saturates, so a large configured
/// retry count cannot overflow.
pub(crate) fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u64 << exp)
}

/// Unescape the XML entities a synthesis event stream may carry.
/// `&amp;` must be handled last so it does not re-expose other entities.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub mod azure;
pub mod edge;
pub mod mock;
