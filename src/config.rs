//! Configuration parameters for the decode, analysis, and export stages

use crate::core::Channels;
use std::path::PathBuf;
use std::time::Duration;

/// Decoder Adapter configuration
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Target sample rate in Hz every decoded buffer conforms to (default: 44100)
    pub sample_rate: u32,

    /// Target channel layout (default: stereo)
    pub channels: Channels,

    /// Path of the ffmpeg binary (default: "ffmpeg", resolved via PATH)
    pub ffmpeg_path: PathBuf,

    /// Wall-clock limit for the decode subprocess (default: 120 s).
    /// Expiry kills the child and fails the run.
    pub timeout: Duration,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: Channels::Stereo,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Analysis Stage configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Segment window duration (default: 1.0 s).
    /// The final window of a buffer may be shorter.
    pub window: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(1),
        }
    }
}

/// Export configuration for compressed output
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// MP3 bitrate in kbit/s (default: 192)
    pub bitrate_kbps: u32,

    /// Path of the ffmpeg binary used for encoding (default: "ffmpeg")
    pub ffmpeg_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bitrate_kbps: 192,
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}
