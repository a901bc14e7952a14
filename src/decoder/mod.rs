//! Decoder Adapter implementations
//!
//! Every decoder conforms its output to the target sample rate and channel
//! layout in [`DecodeConfig`], so downstream stages see one fixed format
//! regardless of the source codec.

pub mod ffmpeg;
pub mod wav;

pub use ffmpeg::FfmpegDecoder;
pub use wav::WavDecoder;

use crate::config::DecodeConfig;
use crate::core::AudioBuffer;
use crate::error::AudioResult;
use std::path::Path;
use std::process::{Command, Stdio};

/// Trait for audio decoders
pub trait Decoder {
    /// Decode an audio source into a conformed sample buffer
    fn decode(&self, source: &Path) -> AudioResult<AudioBuffer>;
}

/// Decode a source file, picking the WAV fast path when possible.
///
/// WAV input is read in-process; everything else goes through the external
/// ffmpeg binary.
pub fn decode_source(source: &Path, config: &DecodeConfig) -> AudioResult<AudioBuffer> {
    let is_wav = source
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    if is_wav {
        WavDecoder::new(config.clone()).decode(source)
    } else {
        FfmpegDecoder::new(config.clone()).decode(source)
    }
}

/// Check whether the configured ffmpeg binary can be executed.
///
/// Used by the CLI for early diagnostics and by tests that exercise the
/// subprocess path.
pub fn ffmpeg_available(ffmpeg_path: &Path) -> bool {
    Command::new(ffmpeg_path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ffmpeg_available_missing_binary() {
        assert!(!ffmpeg_available(&PathBuf::from(
            "/nonexistent/bin/ffmpeg-missing"
        )));
    }
}
