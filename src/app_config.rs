use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::segmenter::DEFAULT_BOUNDARY_CHARS;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Neural voice name, with or without catalog decorations
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speaking-rate multiplier, 1.0 is normal speed
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Synthesis backend selection and settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Punctuation characters that terminate a script unit
    #[serde(default = "default_boundary_chars")]
    pub boundary_chars: String,

    /// Skip subtitle production and write narration audio only
    #[serde(default)]
    pub audio_only: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    // @provider: Edge gateway, no key required
    #[default]
    Edge,
    // @provider: Azure Cognitive Services
    Azure,
}

impl SpeechProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Edge => "Edge",
            Self::Azure => "Azure",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Edge => "edge".to_string(),
            Self::Azure => "azure".to_string(),
        }
    }
}

impl std::fmt::Display for SpeechProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SpeechProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edge" => Ok(Self::Edge),
            "azure" => Ok(Self::Azure),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Synthesis backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Active backend
    #[serde(default)]
    pub provider: SpeechProvider,

    /// Edge gateway settings
    #[serde(default)]
    pub edge: EdgeConfig,

    /// Azure settings
    #[serde(default)]
    pub azure: AzureConfig,

    /// Caller-side retry bound for transient backend failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff time in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum concurrent scripts in batch mode
    #[serde(default = "default_concurrent_scripts")]
    pub concurrent_scripts: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            edge: EdgeConfig::default(),
            azure: AzureConfig::default(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_scripts: default_concurrent_scripts(),
        }
    }
}

/// Edge gateway configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EdgeConfig {
    // @field: Gateway base URL
    #[serde(default = "default_edge_endpoint")]
    pub endpoint: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_edge_endpoint(),
        }
    }
}

/// Azure speech configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AzureConfig {
    // @field: Subscription key for the speech resource
    #[serde(default = "String::new")]
    pub speech_key: String,

    // @field: Service region
    #[serde(default = "default_azure_region")]
    pub speech_region: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            speech_key: String::new(),
            speech_region: default_azure_region(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_voice() -> String {
    "en-US-JennyNeural".to_string()
}

fn default_rate() -> f32 {
    1.0
}

fn default_boundary_chars() -> String {
    DEFAULT_BOUNDARY_CHARS.to_string()
}

fn default_edge_endpoint() -> String {
    "http://localhost:5500".to_string()
}

fn default_azure_region() -> String {
    "eastus".to_string()
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_concurrent_scripts() -> usize {
    2
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.voice.trim().is_empty() {
            return Err(anyhow!("Voice name must not be empty"));
        }

        if !(self.rate > 0.0) {
            return Err(anyhow!("Speaking rate must be positive, got {}", self.rate));
        }

        if self.boundary_chars.is_empty() {
            return Err(anyhow!("Boundary character set must not be empty"));
        }

        // The Edge gateway needs no key; Azure does
        if self.synthesis.provider == SpeechProvider::Azure
            && self.synthesis.azure.speech_key.is_empty()
        {
            return Err(anyhow!("Azure speech key is required for the Azure provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            voice: default_voice(),
            rate: default_rate(),
            synthesis: SynthesisConfig::default(),
            boundary_chars: default_boundary_chars(),
            audio_only: false,
            log_level: LogLevel::default(),
        }
    }
}
