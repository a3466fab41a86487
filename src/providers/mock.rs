/*!
 * Mock backend implementation for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockBackend::speaking()` - emits one fragment per whitespace word of
 *   the input text, with synthetic monotonic timestamps
 * - `MockBackend::scripted(fragments)` - replays a fixed fragment list
 * - `MockBackend::failing()` - always fails with a request error
 * - `MockBackend::empty()` - succeeds with no fragments
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::aligner::TimedFragment;
use crate::errors::BackendError;
use crate::providers::{SpeechBackend, Synthesis};

/// Behavior mode for the mock backend
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Emit one fragment per word of the request text
    Speaking,
    /// Replay a fixed fragment list regardless of the request text
    Scripted(Vec<TimedFragment>),
    /// Always fail with a request error
    Failing,
    /// Succeed with audio but no fragments
    Empty,
}

/// Mock backend for exercising the alignment pipeline without a network
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of synthesize calls observed
    call_count: Arc<AtomicUsize>,
}

/// Tick length of one mock word
const WORD_TICKS: i64 = 5_000_000;

impl MockBackend {
    /// Create a mock with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that speaks the request text word by word
    pub fn speaking() -> Self {
        Self::new(MockBehavior::Speaking)
    }

    /// Mock that replays a fixed fragment list
    pub fn scripted(fragments: Vec<TimedFragment>) -> Self {
        Self::new(MockBehavior::Scripted(fragments))
    }

    /// Mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Mock that returns no fragments
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of synthesize calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// One fragment per whitespace-separated word. Every word but the last
    /// keeps a trailing space, so spaced units match through the fuzzy tiers
    fn speak(text: &str) -> Vec<TimedFragment> {
        let mut fragments = Vec::new();
        let mut tick = 0i64;
        let words: Vec<&str> = text.split_whitespace().collect();

        for (i, word) in words.iter().enumerate() {
            let piece = if i + 1 < words.len() {
                format!("{} ", word)
            } else {
                word.to_string()
            };
            fragments.push(TimedFragment::new(tick, tick + WORD_TICKS, piece));
            tick += WORD_TICKS;
        }

        fragments
    }
}

#[async_trait]
impl SpeechBackend for MockBackend {
    async fn synthesize(&self, text: &str, _voice: &str, _rate: f32) -> Result<Synthesis, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Speaking => Ok(Synthesis {
                audio: vec![0u8; 64],
                fragments: Self::speak(text),
            }),
            MockBehavior::Scripted(fragments) => Ok(Synthesis {
                audio: vec![0u8; 64],
                fragments: fragments.clone(),
            }),
            MockBehavior::Failing => Err(BackendError::RequestFailed(
                "mock backend configured to fail".to_string(),
            )),
            MockBehavior::Empty => Ok(Synthesis {
                audio: vec![0u8; 64],
                fragments: Vec::new(),
            }),
        }
    }
}
