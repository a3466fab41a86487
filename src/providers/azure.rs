use base64::{Engine as _, engine::general_purpose};
use chrono::NaiveTime;
use chrono::Timelike;
use log::{error, info};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::aligner::TimedFragment;
use crate::errors::BackendError;
use crate::providers::{SpeechBackend, Synthesis, unescape_entities};
use crate::subtitle::TICKS_PER_SECOND;
use crate::voices;

/// Azure speech client
#[derive(Debug)]
pub struct AzureSpeech {
    /// Subscription key for the speech resource
    subscription_key: String,
    /// Service region, e.g. "eastus"
    region: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Synthesis request for the Azure speech endpoint
#[derive(Debug, Serialize)]
struct AzureSynthesisRequest {
    /// Script text to narrate
    text: String,
    /// Neural voice name, `-V2` suffix already stripped
    voice: String,
    /// Speaking rate as a signed percent string
    rate: String,
    /// Output audio format identifier
    output_format: String,
    /// Request word-boundary events alongside the audio
    request_word_boundary: bool,
}

/// Synthesis response from the Azure speech endpoint
#[derive(Debug, Deserialize)]
struct AzureSynthesisResponse {
    /// Base64-encoded audio
    audio: String,
    /// Word-boundary events
    #[serde(default)]
    word_boundaries: Vec<AzureWordBoundary>,
}

/// One Azure word-boundary event. The audio offset arrives in ticks while
/// the duration may arrive either as ticks or as an `HH:MM:SS.fffffff`
/// clock string, depending on the SDK version behind the endpoint.
#[derive(Debug, Deserialize)]
struct AzureWordBoundary {
    /// Audio offset in 100 ns ticks
    audio_offset: i64,
    /// Word duration, ticks or clock string
    duration: DurationField,
    /// Spoken text, possibly entity-escaped
    text: String,
}

/// Duration as delivered on the wire
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationField {
    Ticks(i64),
    Clock(String),
}

impl DurationField {
    /// Normalize to ticks; unparseable clock strings count as zero length
    fn to_ticks(&self) -> i64 {
        match self {
            DurationField::Ticks(t) => *t,
            DurationField::Clock(s) => clock_to_ticks(s).unwrap_or(0),
        }
    }
}

/// Convert an `HH:MM:SS.fffffff` clock string to 100 ns ticks
fn clock_to_ticks(clock: &str) -> Option<i64> {
    let time = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f").ok()?;
    let whole_seconds = time.num_seconds_from_midnight() as i64;
    Some(whole_seconds * TICKS_PER_SECOND + time.nanosecond() as i64 / 100)
}

impl AzureSpeech {
    /// Create a new client with default retry settings
    pub fn new(subscription_key: impl Into<String>, region: impl Into<String>) -> Self {
        AzureSpeech {
            subscription_key: subscription_key.into(),
            region: region.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a client with explicit retry settings
    pub fn with_retries(
        subscription_key: impl Into<String>,
        region: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        AzureSpeech {
            subscription_key: subscription_key.into(),
            region: region.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    fn endpoint(&self) -> String {
        format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1/json", self.region)
    }

    async fn backoff(&self, attempt: u32) {
        let base = crate::providers::backoff_delay_ms(self.backoff_base_ms, attempt);
        let jitter = rand::rng().random_range(0..=base / 4);
        tokio::time::sleep(Duration::from_millis(base.saturating_add(jitter))).await;
    }

    fn events_to_fragments(events: Vec<AzureWordBoundary>) -> Vec<TimedFragment> {
        events
            .into_iter()
            .map(|e| {
                let duration = e.duration.to_ticks();
                TimedFragment::new(e.audio_offset, e.audio_offset + duration, unescape_entities(&e.text))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SpeechBackend for AzureSpeech {
    async fn synthesize(&self, text: &str, voice: &str, rate: f32) -> Result<Synthesis, BackendError> {
        if self.subscription_key.is_empty() {
            return Err(BackendError::AuthenticationError(
                "Azure subscription key is not configured".to_string(),
            ));
        }

        // Catalog names may carry the -V2 suffix the service does not accept
        let voice = voices::strip_v2_suffix(voice);
        let request = AzureSynthesisRequest {
            text: text.trim().to_string(),
            voice: voice.clone(),
            rate: voices::rate_to_percent(rate),
            output_format: "audio-48khz-192kbitrate-mono-mp3".to_string(),
            request_word_boundary: true,
        };

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            if attempt > 0 {
                self.backoff(attempt).await;
            }
            info!("Azure synthesis start, voice: {}, try: {}", voice, attempt + 1);

            let response_result = self
                .client
                .post(self.endpoint())
                .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: AzureSynthesisResponse = match response.json().await {
                            Ok(body) => body,
                            Err(e) => {
                                error!("Failed to parse Azure speech response: {}", e);
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
                                "Azure returned no word boundaries".to_string(),
                            ));
                        }

                        return Ok(Synthesis {
                            audio,
                            fragments: Self::events_to_fragments(body.word_boundaries),
                        });
                    } else if status.as_u16() == 401 || status.as_u16() == 403 {
                        let message = response.text().await.unwrap_or_default();
                        return Err(BackendError::AuthenticationError(format!(
                            "Azure rejected the subscription key: {}",
                            message
                        )));
                    } else if status.is_server_error() {
                        let message = response.text().await.unwrap_or_default();
                        error!("Azure speech server error {}: {}", status.as_u16(), message);
                        last_error = Some(BackendError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        let message = response.text().await.unwrap_or_default();
                        return Err(BackendError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    error!("Azure synthesis request failed: {}", e);
                    last_error = Some(BackendError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;
        }

        Err(last_error
            .unwrap_or_else(|| BackendError::RequestFailed("Azure synthesis retries exhausted".to_string())))
    }
}
