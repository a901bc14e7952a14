//! Uniform PCM re-quantization (bitcrusher) - models the quantization noise
//! of a reduced bit depth.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// PCM quantization effect
#[derive(Clone, Debug)]
pub struct PcmQuantize {
    levels: f32,
}

impl PcmQuantize {
    /// Create a quantizer for the given bit depth (1..=16)
    pub fn new(bit_depth: u32) -> AudioResult<Self> {
        if bit_depth == 0 || bit_depth > 16 {
            return Err(AudioError::Config(format!(
                "bit depth must be in 1..=16, got {}",
                bit_depth
            )));
        }

        Ok(PcmQuantize {
            levels: (1u32 << bit_depth) as f32,
        })
    }

    /// Quantize one sample in [-1, 1] onto the level grid
    fn quantize(&self, x: f32) -> f32 {
        // Map to [0, 1], floor onto the grid, map back
        let normalized = (x + 1.0) / 2.0;
        let quantized = (normalized * self.levels).floor() / self.levels;
        quantized * 2.0 - 1.0
    }
}

impl Default for PcmQuantize {
    /// 4-bit quantization, coarse enough to be audible
    fn default() -> Self {
        PcmQuantize { levels: 16.0 }
    }
}

impl super::Effect for PcmQuantize {
    fn name(&self) -> &'static str {
        "pcm quantizer"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let samples = buffer.samples().iter().map(|&s| self.quantize(s)).collect();
        AudioBuffer::new(samples, buffer.sample_rate(), buffer.channels())
    }
}
