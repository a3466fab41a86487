use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::aligner;
use crate::app_config::{Config, SpeechProvider};
use crate::errors::AppError;
use crate::providers::SpeechBackend;
use crate::providers::azure::AzureSpeech;
use crate::providers::edge::EdgeSpeech;
use crate::segmenter::{self, SegmenterConfig};
use crate::subtitle::{self, SubtitleDocument, TICKS_PER_SECOND};
use crate::voices;

// @module: Application controller for narration and subtitle production

/// Outcome of one script's processing
#[derive(Debug, PartialEq)]
pub enum ProduceOutcome {
    /// The script contained no speakable units; nothing was synthesized
    EmptyScript,
    /// Audio was written and subtitle production was skipped
    AudioOnly {
        /// Narration duration in seconds
        duration_secs: f64,
    },
    /// Audio and subtitle artifacts were written and verified
    Produced {
        /// Number of subtitle entries written
        entry_count: usize,
        /// Narration duration in seconds
        duration_secs: f64,
    },
}

/// Main application controller for narration production
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Injected backend, takes precedence over the configured one
    backend_override: Option<Arc<dyn SpeechBackend>>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            backend_override: None,
        })
    }

    /// Create a controller that uses the given backend instead of
    /// constructing one from the configuration
    pub fn with_backend(config: Config, backend: Arc<dyn SpeechBackend>) -> Result<Self> {
        Ok(Self {
            config,
            backend_override: Some(backend),
        })
    }

    /// Build the configured speech backend
    pub fn backend(&self) -> Arc<dyn SpeechBackend> {
        if let Some(backend) = &self.backend_override {
            return Arc::clone(backend);
        }
        match self.config.synthesis.provider {
            SpeechProvider::Edge => Arc::new(EdgeSpeech::with_retries(
                self.config.synthesis.edge.endpoint.clone(),
                self.config.synthesis.retry_count,
                self.config.synthesis.retry_backoff_ms,
            )),
            SpeechProvider::Azure => Arc::new(AzureSpeech::with_retries(
                self.config.synthesis.azure.speech_key.clone(),
                self.config.synthesis.azure.speech_region.clone(),
                self.config.synthesis.retry_count,
                self.config.synthesis.retry_backoff_ms,
            )),
        }
    }

    /// Narrate one script and produce the matching subtitle file.
    ///
    /// Pipeline: normalize the script, segment it, synthesize narration,
    /// write the audio, align the backend's fragments against the script
    /// units, render the SRT and verify it by re-parsing. On alignment
    /// drift or a corrupt artifact no subtitle file is left behind.
    /// With `audio_only` configured, processing stops after the audio is
    /// written and no subtitle file is produced.
    pub async fn produce_subtitle(
        &self,
        backend: &dyn SpeechBackend,
        script_text: &str,
        audio_path: &Path,
        subtitle_path: &Path,
    ) -> Result<ProduceOutcome, AppError> {
        let script = segmenter::format_script(script_text);
        let seg_config = SegmenterConfig::with_boundary_chars(&self.config.boundary_chars);
        let units = segmenter::segment(&script, &seg_config);

        if units.is_empty() {
            info!("Script yielded no speakable units, nothing to synthesize");
            return Ok(ProduceOutcome::EmptyScript);
        }
        debug!("Script segmented into {} units", units.len());

        let voice = voices::parse_voice_name(&self.config.voice);
        let synthesis = backend.synthesize(&script, &voice, self.config.rate).await?;

        backend.write_audio(&synthesis, audio_path)?;
        info!("Audio written: {}", audio_path.display());

        if self.config.audio_only {
            let last_end = synthesis.fragments.last().map(|f| f.end_ticks).unwrap_or(0);
            info!("Audio-only mode, skipping subtitle production");
            return Ok(ProduceOutcome::AudioOnly {
                duration_secs: last_end.max(0) as f64 / TICKS_PER_SECOND as f64,
            });
        }

        let report = aligner::align(&synthesis.fragments, &units)?;
        let duration_secs = report.duration_secs();

        let document = SubtitleDocument::new(report.entries);
        let entry_count = document.entries.len();
        document
            .write_to_srt(subtitle_path)
            .map_err(|e| AppError::File(e.to_string()))?;

        // Independent re-parse of the fresh artifact; removes it on failure
        let parsed_duration = subtitle::verify_artifact(subtitle_path)?;
        info!(
            "Subtitle file created: {}, entries: {}, duration: {:.2}s",
            subtitle_path.display(),
            entry_count,
            parsed_duration
        );

        Ok(ProduceOutcome::Produced {
            entry_count,
            duration_secs,
        })
    }

    /// Process a single script file, deriving output paths from its stem
    pub async fn run_file(&self, input_file: &Path, output_dir: &Path) -> Result<ProduceOutcome> {
        if !input_file.is_file() {
            return Err(anyhow!("Script file not found: {}", input_file.display()));
        }

        let script = std::fs::read_to_string(input_file)
            .with_context(|| format!("Failed to read script file: {}", input_file.display()))?;

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "narration".to_string());
        let audio_path = output_dir.join(format!("{}.mp3", stem));
        let subtitle_path = output_dir.join(format!("{}.srt", stem));

        let backend = self.backend();
        let outcome = self
            .produce_subtitle(backend.as_ref(), &script, &audio_path, &subtitle_path)
            .await
            .with_context(|| format!("Failed to process script: {}", input_file.display()))?;

        Ok(outcome)
    }

    /// Process every `*.txt` script in a directory with bounded concurrency
    pub async fn run_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        let scripts = Self::find_script_files(input_dir);
        if scripts.is_empty() {
            warn!("No script files found in {}", input_dir.display());
            return Ok(());
        }
        info!("Processing {} script files from {}", scripts.len(), input_dir.display());

        let progress = ProgressBar::new(scripts.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        let backend = self.backend();
        let mut failures = 0usize;

        let mut stream = futures::stream::iter(scripts.into_iter().map(|script_path| {
            let backend = Arc::clone(&backend);
            let output_dir = output_dir.to_path_buf();
            async move {
                let result = self
                    .process_one(backend.as_ref(), &script_path, &output_dir)
                    .await;
                (script_path, result)
            }
        }))
        .buffer_unordered(self.config.synthesis.concurrent_scripts.max(1));

        while let Some((script_path, result)) = stream.next().await {
            match result {
                Ok(outcome) => {
                    debug!("Processed {}: {:?}", script_path.display(), outcome);
                }
                Err(e) => {
                    failures += 1;
                    error!("Failed to process {}: {}", script_path.display(), e);
                }
            }
            progress.inc(1);
        }
        progress.finish_with_message("done");

        if failures > 0 {
            return Err(anyhow!("{} script(s) failed to process", failures));
        }
        Ok(())
    }

    async fn process_one(
        &self,
        backend: &dyn SpeechBackend,
        script_path: &Path,
        output_dir: &Path,
    ) -> Result<ProduceOutcome> {
        let script = std::fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read script file: {}", script_path.display()))?;
        std::fs::create_dir_all(output_dir)?;

        let stem = script_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "narration".to_string());
        let audio_path = output_dir.join(format!("{}.mp3", stem));
        let subtitle_path = output_dir.join(format!("{}.srt", stem));

        let outcome = self
            .produce_subtitle(backend, &script, &audio_path, &subtitle_path)
            .await?;
        Ok(outcome)
    }

    /// Collect `*.txt` files under a directory, sorted for determinism
    fn find_script_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("txt"))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        files
    }
}
