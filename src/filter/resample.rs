use crate::core::{AudioBuffer, Channels};
use crate::error::{AudioError, AudioResult};

/// Sample rate converter using per-channel linear interpolation
pub struct Resample {
    input_rate: u32,
    output_rate: u32,
    channels: Channels,
}

impl Resample {
    /// Create a new resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    /// * `channels` - Channel layout of the buffers to convert
    pub fn new(input_rate: u32, output_rate: u32, channels: Channels) -> AudioResult<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        Ok(Resample {
            input_rate,
            output_rate,
            channels,
        })
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Linear interpolation over a single channel plane
    fn linear_resample(input: &[f32], ratio: f64) -> Vec<f32> {
        if input.is_empty() || ratio <= 0.0 {
            return Vec::new();
        }

        let output_len = (input.len() as f64 / ratio).ceil() as usize;
        let mut output = Vec::with_capacity(output_len);

        for i in 0..output_len {
            let input_pos = i as f64 * ratio;
            let input_idx = input_pos.floor() as usize;

            if input_idx + 1 < input.len() {
                let frac = input_pos - input_idx as f64;
                let sample = (input[input_idx] as f64 * (1.0 - frac)
                    + input[input_idx + 1] as f64 * frac) as f32;
                output.push(sample.clamp(-1.0, 1.0));
            } else if input_idx < input.len() {
                // Tail: no right neighbor to interpolate with
                output.push(input[input_idx]);
            }
        }

        output
    }
}

impl super::Filter for Resample {
    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        if buffer.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: buffer.channels().count(),
            });
        }

        if buffer.sample_rate() != self.input_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: buffer.sample_rate(),
            });
        }

        if self.input_rate == self.output_rate {
            return Ok(buffer.clone());
        }

        let ratio = self.input_rate as f64 / self.output_rate as f64;

        // Channels are resampled independently; interpolating across the
        // interleaved stream would blend neighboring channels.
        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| Self::linear_resample(&plane, ratio))
            .collect();

        AudioBuffer::from_planes(planes, self.output_rate)
    }
}
