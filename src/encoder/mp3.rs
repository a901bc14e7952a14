//! MP3 export through the external ffmpeg encoder.
//!
//! Samples are buffered until finalization, staged as a temporary 16-bit
//! WAV, and handed to ffmpeg's libmp3lame at the configured bitrate. The
//! error surface mirrors the decoder's: missing binary, non-zero exit with
//! captured stderr.

use crate::config::ExportConfig;
use crate::core::{AudioBuffer, Channels};
use crate::error::{AudioError, AudioResult};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// MP3 encoder backed by ffmpeg
pub struct Mp3Encoder {
    path: PathBuf,
    config: ExportConfig,
    sample_rate: u32,
    channels: Channels,
    samples: Vec<f32>,
    finalized: bool,
}

impl Mp3Encoder {
    /// Create an MP3 encoder writing to `path`
    pub fn new<P: AsRef<Path>>(
        path: P,
        sample_rate: u32,
        channels: Channels,
        config: &ExportConfig,
    ) -> Self {
        Mp3Encoder {
            path: path.as_ref().to_path_buf(),
            config: config.clone(),
            sample_rate,
            channels,
            samples: Vec::new(),
            finalized: false,
        }
    }

    /// Stage the accumulated samples as a 16-bit PCM WAV
    fn write_staging_wav(&self) -> AudioResult<tempfile::NamedTempFile> {
        let temp_file = tempfile::Builder::new()
            .prefix("commscape_export_")
            .suffix(".wav")
            .tempfile()?;

        let spec = hound::WavSpec {
            channels: self.channels.count() as u16,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::new(
            std::io::BufWriter::new(temp_file.reopen()?),
            spec,
        )
        .map_err(|e| AudioError::Encode(e.to_string()))?;

        for &sample in &self.samples {
            let quantized = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;

        Ok(temp_file)
    }

    fn run_ffmpeg(&self, staging: &Path) -> AudioResult<()> {
        let bitrate = format!("{}k", self.config.bitrate_kbps);

        log::debug!(
            "encoding {} at {} via {}",
            self.path.display(),
            bitrate,
            self.config.ffmpeg_path.display()
        );

        let output = Command::new(&self.config.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"])
            .arg("-i")
            .arg(staging)
            .args(["-codec:a", "libmp3lame", "-b:a", &bitrate])
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    AudioError::MissingTool {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    AudioError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AudioError::ToolFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}

impl super::Encoder for Mp3Encoder {
    fn encode(&mut self, buffer: &AudioBuffer) -> AudioResult<()> {
        if self.finalized {
            return Err(AudioError::Encode("encoder already finalized".to_string()));
        }

        if buffer.sample_rate() != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: buffer.sample_rate(),
            });
        }

        if buffer.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: buffer.channels().count(),
            });
        }

        self.samples.extend_from_slice(buffer.samples());
        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if self.finalized {
            return Ok(());
        }

        if self.samples.is_empty() {
            return Err(AudioError::Encode("no samples to encode".to_string()));
        }

        let staging = self.write_staging_wav()?;
        self.run_ffmpeg(staging.path())?;
        self.finalized = true;

        // Staging file is removed when dropped
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ffmpeg_available;
    use crate::encoder::Encoder;

    fn tone_buffer() -> AudioBuffer {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / 44100.0).sin() * 0.5)
            .collect();
        AudioBuffer::new(samples, 44100, Channels::Mono).unwrap()
    }

    #[test]
    fn test_finalize_without_samples_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = Mp3Encoder::new(
            dir.path().join("out.mp3"),
            44100,
            Channels::Mono,
            &ExportConfig::default(),
        );
        assert!(encoder.finalize().is_err());
    }

    #[test]
    fn test_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/bin/ffmpeg-missing"),
            ..ExportConfig::default()
        };

        let mut encoder =
            Mp3Encoder::new(dir.path().join("out.mp3"), 44100, Channels::Mono, &config);
        encoder.encode(&tone_buffer()).unwrap();

        let result = encoder.finalize();
        assert!(matches!(result, Err(AudioError::MissingTool { .. })));
    }

    #[test]
    fn test_encode_produces_mp3() {
        let config = ExportConfig::default();
        if !ffmpeg_available(&config.ffmpeg_path) {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("out.mp3");

        let mut encoder = Mp3Encoder::new(&out_path, 44100, Channels::Mono, &config);
        encoder.encode(&tone_buffer()).unwrap();
        encoder.finalize().unwrap();

        let metadata = std::fs::metadata(&out_path).unwrap();
        assert!(metadata.len() > 1000, "suspiciously small MP3 output");
    }

    #[test]
    fn test_encode_rejects_format_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = Mp3Encoder::new(
            dir.path().join("out.mp3"),
            44100,
            Channels::Mono,
            &ExportConfig::default(),
        );

        let wrong_rate = AudioBuffer::new(vec![0.0; 100], 48000, Channels::Mono).unwrap();
        assert!(encoder.encode(&wrong_rate).is_err());
    }
}
