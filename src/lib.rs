#![warn(missing_docs)]

//! # commscape
//!
//! Audio stylization and analysis toolkit built around an ffmpeg decode
//! front end: decode any audio container into a fixed-format sample buffer,
//! push it through a chain of communication-channel effects, measure the
//! result, and export it.
//!
//! ## Pipeline
//!
//! ```text
//! Audio Source -> Decoder Adapter -> [Effect Chain] -> Analysis -> Export
//! ```
//!
//! - **Decode** - any container/codec via the external ffmpeg tool; WAV
//!   directly in-process
//! - **Effects** - tape, vinyl, AM radio, PCM quantization, A-law
//!   companding, aliasing, Hamming(7,4) channel coding, AM and FSK
//!   modulation, Doppler shift, convolution reverb, normalization
//! - **Analyze** - per-segment feature records (peak, RMS, energy,
//!   zero-crossing rate, spectral centroid) and SNR against the original
//! - **Export** - WAV directly, MP3 through ffmpeg
//!
//! ## Quick Start
//!
//! ```no_run
//! use commscape::{Pipeline, effects};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::default();
//! let mut chain = effects::chain_from_names(["vinyl", "normalize"])?;
//!
//! let report = pipeline.run(Path::new("input.mp3"), &mut chain, None)?;
//! println!("segments: {}", report.features.len());
//! # Ok::<(), commscape::AudioError>(())
//! ```

/// Analysis stage: segmentation, features, SNR, spectra
pub mod analysis;
/// Stage configuration types
pub mod config;
/// Core audio types and structures
pub mod core;
/// Decoder Adapter implementations
pub mod decoder;
/// Audio effect implementations
pub mod effects;
/// Audio export implementations
pub mod encoder;
/// Error types for audio operations
pub mod error;
/// Format conversion filters
pub mod filter;
/// The linear processing pipeline
pub mod pipeline;

pub use analysis::FeatureRecord;
pub use config::{AnalysisConfig, DecodeConfig, ExportConfig};
pub use core::{AudioBuffer, Channels};
pub use error::{AudioError, AudioResult};
pub use pipeline::{Pipeline, RunReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
