// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, SpeechProvider};
use app_controller::Controller;

mod aligner;
mod app_config;
mod app_controller;
mod errors;
mod providers;
mod segmenter;
mod subtitle;
mod voices;

/// CLI Wrapper for SpeechProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeechProvider {
    Edge,
    Azure,
}

impl From<CliSpeechProvider> for SpeechProvider {
    fn from(cli_provider: CliSpeechProvider) -> Self {
        match cli_provider {
            CliSpeechProvider::Edge => SpeechProvider::Edge,
            CliSpeechProvider::Azure => SpeechProvider::Azure,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List catalog voices, optionally filtered by locale prefixes
    Voices {
        /// Locale prefixes to filter by (e.g. 'en-US', 'zh'); empty lists defaults
        locales: Vec<String>,
    },
}

/// voxalign - narrated audio with script-aligned subtitles
///
/// Synthesizes narration for a text script through a TTS backend and writes
/// a SubRip subtitle file whose lines mirror the script exactly, timed from
/// the engine's own word boundaries.
#[derive(Parser, Debug)]
#[command(name = "voxalign")]
#[command(version = "1.0.0")]
#[command(about = "TTS narration with script-aligned subtitles")]
#[command(long_about = "voxalign narrates a script via a speech synthesis backend and produces \
an .srt subtitle file aligned against the script's punctuation units.

EXAMPLES:
    voxalign script.txt                         # Narrate one script with default config
    voxalign -V en-US-AriaNeural script.txt     # Pick a voice
    voxalign -r 1.2 script.txt                  # Speak 20% faster
    voxalign -b azure script.txt                # Use the Azure backend
    voxalign --audio-only script.txt            # Narrate without subtitles
    voxalign scripts/ -o narrated/              # Process a directory of scripts
    voxalign voices en zh-CN                    # List voices for locales
    voxalign completions bash > voxalign.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED BACKENDS:
    edge   - edge-tts gateway (default, no API key required)
    azure  - Azure Cognitive Services (requires speech key and region)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input script file or directory of *.txt scripts
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for audio and subtitle files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Voice name (catalog decorations like -Female are stripped)
    #[arg(short = 'V', long)]
    voice: Option<String>,

    /// Speaking-rate multiplier (1.0 = normal)
    #[arg(short, long)]
    rate: Option<f32>,

    /// Speech backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliSpeechProvider>,

    /// Write narration audio only, skip subtitle production
    #[arg(long)]
    audio_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "voxalign", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Voices { locales }) => {
            let names = if locales.is_empty() {
                voices::all_voices(None)
            } else {
                let refs: Vec<&str> = locales.iter().map(|s| s.as_str()).collect();
                voices::all_voices(Some(&refs))
            };
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;
            run_narrate(
                input_path,
                cli.output_dir,
                cli.voice,
                cli.rate,
                cli.backend,
                cli.audio_only,
                cli.config_path,
                cli.log_level,
            )
            .await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_narrate(
    input_path: PathBuf,
    output_dir: PathBuf,
    voice: Option<String>,
    rate: Option<f32>,
    backend: Option<CliSpeechProvider>,
    audio_only: bool,
    config_path: String,
    log_level: Option<CliLogLevel>,
) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config = if Path::new(&config_path).exists() {
        let file = File::open(&config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(voice) = &voice {
            config.voice = voice.clone();
        }
        if let Some(rate) = rate {
            config.rate = rate;
        }
        if let Some(backend) = backend {
            config.synthesis.provider = backend.into();
        }
        if audio_only {
            config.audio_only = true;
        }
        if let Some(log_level) = &log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        if let Some(voice) = &voice {
            config.voice = voice.clone();
        }
        if let Some(rate) = rate {
            config.rate = rate;
        }
        if let Some(backend) = backend {
            config.synthesis.provider = backend.into();
        }
        if audio_only {
            config.audio_only = true;
        }
        if let Some(log_level) = &log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(&config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    info!(
        "Using backend: {}, voice: {}, rate: {}",
        config.synthesis.provider.display_name(),
        config.voice,
        config.rate
    );

    let controller = Controller::with_config(config)?;

    if input_path.is_dir() {
        controller.run_directory(&input_path, &output_dir).await
    } else {
        let outcome = controller.run_file(&input_path, &output_dir).await?;
        info!("Finished: {:?}", outcome);
        Ok(())
    }
}
