use crate::core::{AudioBuffer, Channels};
use crate::error::{AudioError, AudioResult};
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// WAV encoder writing 32-bit float samples
pub struct WavEncoder {
    writer: Option<WavWriter<std::io::BufWriter<std::fs::File>>>,
    sample_rate: u32,
    channels: Channels,
}

impl WavEncoder {
    /// Create a WAV encoder writing to `path`
    pub fn new<P: AsRef<Path>>(
        path: P,
        sample_rate: u32,
        channels: Channels,
    ) -> AudioResult<Self> {
        let spec = WavSpec {
            channels: channels.count() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let writer =
            WavWriter::create(path, spec).map_err(|e| AudioError::Encode(e.to_string()))?;

        Ok(WavEncoder {
            writer: Some(writer),
            sample_rate,
            channels,
        })
    }

    /// Get the number of samples written so far
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, buffer: &AudioBuffer) -> AudioResult<()> {
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

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::Encode("encoder already finalized".to_string()))?;

        for &sample in buffer.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }
        Ok(())
    }
}
