use crate::core::{AudioBuffer, Channels};
use crate::error::{AudioError, AudioResult};

/// Channel layout converter (mono <-> stereo)
pub struct Remix {
    input_channels: Channels,
    output_channels: Channels,
}

impl Remix {
    /// Create a new channel remixer
    pub fn new(input_channels: Channels, output_channels: Channels) -> Self {
        Remix {
            input_channels,
            output_channels,
        }
    }

    /// Remix stereo to mono by averaging both channels
    fn stereo_to_mono(input: &[f32]) -> Vec<f32> {
        input
            .chunks_exact(2)
            .map(|frame| (frame[0] + frame[1]) / 2.0)
            .collect()
    }

    /// Remix mono to stereo by duplicating the channel
    fn mono_to_stereo(input: &[f32]) -> Vec<f32> {
        let mut output = Vec::with_capacity(input.len() * 2);
        for &sample in input {
            output.push(sample);
            output.push(sample);
        }
        output
    }
}

impl super::Filter for Remix {
    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        if buffer.channels() != self.input_channels {
            return Err(AudioError::InvalidChannels {
                expected: self.input_channels.count(),
                got: buffer.channels().count(),
            });
        }

        let samples = buffer.samples();

        let output_samples = match (self.input_channels, self.output_channels) {
            (src, dst) if src == dst => samples.to_vec(),
            (Channels::Stereo, Channels::Mono) => Self::stereo_to_mono(samples),
            (Channels::Mono, Channels::Stereo) => Self::mono_to_stereo(samples),
            _ => unreachable!("mono/stereo cases are exhaustive"),
        };

        AudioBuffer::new(output_samples, buffer.sample_rate(), self.output_channels)
    }
}
