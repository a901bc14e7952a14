//! Audio export implementations

pub mod mp3;
pub mod wav;

pub use mp3::Mp3Encoder;
pub use wav::WavEncoder;

use crate::config::ExportConfig;
use crate::core::AudioBuffer;
use crate::error::AudioResult;
use std::path::Path;

/// Trait for audio encoders
pub trait Encoder {
    /// Encode an audio buffer to the output
    fn encode(&mut self, buffer: &AudioBuffer) -> AudioResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}

/// Export a buffer to `path`, picking the format by extension:
/// `.mp3` goes through ffmpeg, everything else is written as WAV.
pub fn export_buffer(
    buffer: &AudioBuffer,
    path: &Path,
    config: &ExportConfig,
) -> AudioResult<()> {
    let is_mp3 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));

    if is_mp3 {
        let mut encoder = Mp3Encoder::new(path, buffer.sample_rate(), buffer.channels(), config);
        encoder.encode(buffer)?;
        encoder.finalize()
    } else {
        let mut encoder = WavEncoder::new(path, buffer.sample_rate(), buffer.channels())?;
        encoder.encode(buffer)?;
        encoder.finalize()
    }
}
