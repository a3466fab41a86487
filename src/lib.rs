/*!
 * # voxalign - TTS narration with script-aligned subtitles
 *
 * A Rust library for narrating scripts through speech synthesis backends and
 * producing SubRip subtitle files whose text mirrors the authored script
 * exactly, with engine-accurate timing.
 *
 * ## Features
 *
 * - Deterministic punctuation-based script segmentation
 * - Re-segmentation alignment of timed word-boundary fragments against
 *   script units, with a three-tier fuzzy comparator
 * - Drift detection: a subtitle file is only written when every script unit
 *   was matched, and a written file that fails re-parsing is removed
 * - Pluggable synthesis backends (Edge gateway, Azure) behind one trait
 * - Immutable voice catalog with locale filtering
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Script normalization and punctuation segmentation
 * - `aligner`: Fragment accumulation and three-tier matching
 * - `subtitle`: SRT rendering, parsing and artifact verification
 * - `voices`: Voice catalog and voice-name utilities
 * - `app_controller`: Main application controller
 * - `providers`: Speech backend clients:
 *   - `providers::edge`: edge-tts gateway client
 *   - `providers::azure`: Azure Cognitive Services client
 *   - `providers::mock`: behavior-mode mock backend for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod aligner;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod providers;
pub mod segmenter;
pub mod subtitle;
pub mod voices;

// Re-export main types for easier usage
pub use aligner::{AlignmentReport, TimedFragment, align};
pub use app_config::Config;
pub use app_controller::{Controller, ProduceOutcome};
pub use errors::{AlignError, AppError, BackendError, SubtitleError};
pub use providers::{SpeechBackend, Synthesis};
pub use segmenter::{SegmenterConfig, format_script, segment};
pub use subtitle::{SubtitleDocument, SubtitleEntry};
