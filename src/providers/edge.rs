use base64::{Engine as _, engine::general_purpose};
use log::{debug, error, info};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::aligner::TimedFragment;
use crate::errors::BackendError;
use crate::providers::{SpeechBackend, Synthesis, unescape_entities};
use crate::voices;

/// Edge speech client, talking to an edge-tts gateway
#[derive(Debug)]
pub struct EdgeSpeech {
    /// Base URL of the gateway
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Synthesis request for the gateway
#[derive(Debug, Serialize)]
struct SynthesisRequest {
    /// Script text to narrate
    text: String,
    /// Neural voice name
    voice: String,
    /// Speaking rate as a signed percent string, e.g. "+10%"
    rate: String,
    /// Ask the gateway to include word-boundary events
    word_boundaries: bool,
}

/// Synthesis response from the gateway
#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    /// Base64-encoded audio
    audio: String,
    /// Word-boundary events, ordered by offset
    #[serde(default)]
    word_boundaries: Vec<WordBoundaryEvent>,
}

/// One word-boundary event in the response
#[derive(Debug, Deserialize)]
struct WordBoundaryEvent {
    /// Offset of the word start in 100 ns ticks
    offset: i64,
    /// Duration of the word in 100 ns ticks
    duration: i64,
    /// Spoken text, possibly entity-escaped
    text: String,
}

impl EdgeSpeech {
    /// Create a new client with default retry settings
    pub fn new(url: impl Into<String>) -> Self {
        EdgeSpeech {
            base_url: url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a client with explicit retry settings
    pub fn with_retries(url: impl Into<String>, max_retries: u32, backoff_base_ms: u64) -> Self {
        EdgeSpeech {
            base_url: url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Exponential backoff with jitter before a retry attempt
    async fn backoff(&self, attempt: u32) {
        let base = crate::providers::backoff_delay_ms(self.backoff_base_ms, attempt);
        let jitter = rand::rng().random_range(0..=base / 4);
        tokio::time::sleep(Duration::from_millis(base.saturating_add(jitter))).await;
    }

    /// Convert gateway events into the aligner's fragment form,
    /// unescaping entities at this boundary
    fn events_to_fragments(events: Vec<WordBoundaryEvent>) -> Vec<TimedFragment> {
        events
            .into_iter()
            .map(|e| TimedFragment::new(e.offset, e.offset + e.duration, unescape_entities(&e.text)))
            .collect()
    }
}

#[async_trait::async_trait]
impl SpeechBackend for EdgeSpeech {
    async fn synthesize(&self, text: &str, voice: &str, rate: f32) -> Result<Synthesis, BackendError> {
        let url = format!("{}/v1/synthesize", self.base_url);
        let request = SynthesisRequest {
            text: text.trim().to_string(),
            voice: voice.to_string(),
            rate: voices::rate_to_percent(rate),
            word_boundaries: true,
        };

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            if attempt > 0 {
                self.backoff(attempt).await;
            }
            info!("Edge synthesis start, voice: {}, try: {}", voice, attempt + 1);

            let response_result = self.client.post(&url).json(&request).send().await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: SynthesisResponse = match response.json().await {
                            Ok(body) => body,
                            Err(e) => {
                                error!("Failed to parse Edge gateway response: {}", e);
                                last_error = Some(BackendError::ParseError(e.to_string()));
                                attempt += 1;
                                continue;
                            }
                        };

                        let audio = general_purpose::STANDARD
                            .decode(&body.audio)
                            .map_err(|e| BackendError::ParseError(format!("Invalid base64 audio: {}", e)))?;

                        if body.word_boundaries.is_empty() {
                            return Err(BackendError::EmptySynthesis(
                                "Gateway returned no word boundaries".to_string(),
                            ));
                        }

                        debug!(
                            "Edge synthesis completed: {} audio bytes, {} fragments",
                            audio.len(),
                            body.word_boundaries.len()
                        );
                        return Ok(Synthesis {
                            audio,
                            fragments: Self::events_to_fragments(body.word_boundaries),
                        });
                    } else if status.is_server_error() {
                        // Server error, can retry
                        let message = response.text().await.unwrap_or_default();
                        error!("Edge gateway server error {}: {}", status.as_u16(), message);
                        last_error = Some(BackendError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        // Client error, retrying will not help
                        let message = response.text().await.unwrap_or_default();
                        return Err(BackendError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    error!("Edge synthesis request failed: {}", e);
                    last_error = Some(BackendError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;
        }

        Err(last_error
            .unwrap_or_else(|| BackendError::RequestFailed("Edge synthesis retries exhausted".to_string())))
    }
}
