//! In-process WAV decoder
//!
//! Reads WAV files with hound and conforms them to the configured target
//! format with the resample and remix filters, so WAV input does not require
//! a working ffmpeg installation.

use crate::config::DecodeConfig;
use crate::core::{AudioBuffer, Channels};
use crate::error::{AudioError, AudioResult};
use crate::filter::{Filter, Remix, Resample};
use std::path::Path;

/// hound-based WAV decoder with format conformance
pub struct WavDecoder {
    config: DecodeConfig,
}

impl WavDecoder {
    /// Create a decoder with the given target format configuration
    pub fn new(config: DecodeConfig) -> Self {
        WavDecoder { config }
    }

    fn read_samples(reader: &mut hound::WavReader<std::io::BufReader<std::fs::File>>)
    -> AudioResult<Vec<f32>> {
        let spec = reader.spec();

        match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map_err(|e| AudioError::Decode(e.to_string())))
                .collect(),
            (hound::SampleFormat::Int, bits) if bits > 0 && bits <= 32 => {
                let scale = (1i64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| {
                        s.map(|v| v as f32 / scale)
                            .map_err(|e| AudioError::Decode(e.to_string()))
                    })
                    .collect()
            }
            (format, bits) => Err(AudioError::UnsupportedFormat(format!(
                "WAV sample format {:?} at {} bits",
                format, bits
            ))),
        }
    }

    fn conform(&self, buffer: AudioBuffer) -> AudioResult<AudioBuffer> {
        let mut buffer = buffer;

        if buffer.channels() != self.config.channels {
            let mut remix = Remix::new(buffer.channels(), self.config.channels);
            buffer = remix.process(&buffer)?;
        }

        if buffer.sample_rate() != self.config.sample_rate {
            let mut resample = Resample::new(
                buffer.sample_rate(),
                self.config.sample_rate,
                buffer.channels(),
            )?;
            buffer = resample.process(&buffer)?;
        }

        Ok(buffer)
    }
}

impl super::Decoder for WavDecoder {
    fn decode(&self, source: &Path) -> AudioResult<AudioBuffer> {
        let mut reader = hound::WavReader::open(source).map_err(|e| match e {
            hound::Error::IoError(io) => AudioError::Io(io),
            other => AudioError::Decode(other.to_string()),
        })?;

        let spec = reader.spec();
        let channels = Channels::from_count(spec.channels as u32)?;
        let samples = Self::read_samples(&mut reader)?;

        if samples.is_empty() {
            return Err(AudioError::Decode(format!(
                "WAV file holds no samples: {}",
                source.display()
            )));
        }

        let native = AudioBuffer::new(samples, spec.sample_rate, channels)?;

        log::debug!(
            "read {} frames at {} Hz ({}) from {}",
            native.frames(),
            native.sample_rate(),
            native.channels().name(),
            source.display()
        );

        self.conform(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;

    fn write_wav(rate: u32, channels: u16, frames: usize, value: f32) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
        for _ in 0..frames * channels as usize {
            writer.write_sample((value * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
        file
    }

    fn target(rate: u32, channels: Channels) -> DecodeConfig {
        DecodeConfig {
            sample_rate: rate,
            channels,
            ..DecodeConfig::default()
        }
    }

    #[test]
    fn test_decode_native_format() {
        let file = write_wav(16000, 1, 16000, 0.0);
        let decoder = WavDecoder::new(target(16000, Channels::Mono));
        let buffer = decoder.decode(file.path()).unwrap();

        assert_eq!(buffer.sample_rate(), 16000);
        assert_eq!(buffer.channels(), Channels::Mono);
        assert_eq!(buffer.frames(), 16000);
    }

    #[test]
    fn test_decode_conforms_rate_and_layout() {
        // 44.1 kHz stereo source conformed to 16 kHz mono
        let file = write_wav(44100, 2, 44100, 0.25);
        let decoder = WavDecoder::new(target(16000, Channels::Mono));
        let buffer = decoder.decode(file.path()).unwrap();

        assert_eq!(buffer.sample_rate(), 16000);
        assert_eq!(buffer.channels(), Channels::Mono);
        // 1 s of audio at the target rate, within interpolation rounding
        assert!((buffer.frames() as i64 - 16000).abs() < 10);
    }

    #[test]
    fn test_decode_missing_file() {
        let decoder = WavDecoder::new(target(16000, Channels::Mono));
        assert!(decoder.decode(Path::new("/nonexistent/file.wav")).is_err());
    }

    #[test]
    fn test_decode_empty_wav_fails() {
        let file = write_wav(16000, 1, 0, 0.0);
        let decoder = WavDecoder::new(target(16000, Channels::Mono));
        let result = decoder.decode(file.path());
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }

    #[test]
    fn test_decode_float_wav() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
        for _ in 0..800 {
            writer.write_sample(0.5f32).unwrap();
        }
        writer.finalize().unwrap();

        let decoder = WavDecoder::new(target(8000, Channels::Mono));
        let buffer = decoder.decode(file.path()).unwrap();
        assert_eq!(buffer.frames(), 800);
        assert!((buffer.samples()[0] - 0.5).abs() < 1e-6);
    }
}
