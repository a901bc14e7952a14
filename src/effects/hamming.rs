//! Hamming(7,4) channel coding over a noisy binary channel.
//!
//! The audio is quantized to 16-bit words, serialized to a bitstream, block
//! encoded with Hamming(7,4), pushed through a bit-flipping channel, decoded
//! with single-error correction, and reconstructed. At the default error
//! rate most flips are corrected; raising it past the code's capability
//! makes the residual bit errors audible as impulse noise.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Bits per quantized sample word
const BIT_DEPTH: usize = 16;
/// Quantization full scale (16-bit signed)
const QUANT_MAX: f32 = i16::MAX as f32;

/// Hamming(7,4) channel code effect
#[derive(Clone, Debug)]
pub struct HammingCode {
    /// Channel bit-flip probability (default 1e-4)
    pub error_rate: f64,
    /// RNG seed for the channel noise
    pub seed: u64,
}

impl HammingCode {
    /// Create a channel coder with the given bit-flip probability
    pub fn new(error_rate: f64) -> AudioResult<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(AudioError::Config(format!(
                "error rate must be in [0, 1], got {}",
                error_rate
            )));
        }

        Ok(HammingCode {
            error_rate,
            seed: 0,
        })
    }

    /// Encode 4 data bits into a 7-bit block [p1, p2, d1, p3, d2, d3, d4]
    fn encode_block(data: [u8; 4]) -> [u8; 7] {
        let [d1, d2, d3, d4] = data;

        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p3 = d2 ^ d3 ^ d4;

        [p1, p2, d1, p3, d2, d3, d4]
    }

    /// Decode a 7-bit block, correcting at most one flipped bit
    fn decode_block(mut block: [u8; 7]) -> [u8; 4] {
        let [p1, p2, d1, p3, d2, d3, d4] = block;

        let s1 = p1 ^ d1 ^ d2 ^ d4;
        let s2 = p2 ^ d1 ^ d3 ^ d4;
        let s3 = p3 ^ d2 ^ d3 ^ d4;

        // The syndrome is the 1-based position of the flipped bit
        let error_pos = (s3 << 2 | s2 << 1 | s1) as usize;
        if error_pos != 0 {
            block[error_pos - 1] ^= 1;
        }

        [block[2], block[4], block[5], block[6]]
    }

    /// Quantize a channel plane to 16-bit words and serialize MSB-first
    fn plane_to_bits(plane: &[f32]) -> Vec<u8> {
        let mut bits = Vec::with_capacity(plane.len() * BIT_DEPTH);

        for &sample in plane {
            let word = (sample * QUANT_MAX).clamp(-QUANT_MAX, QUANT_MAX) as i16 as u16;
            for shift in (0..BIT_DEPTH).rev() {
                bits.push(((word >> shift) & 1) as u8);
            }
        }

        bits
    }

    /// Reassemble 16-bit words from the bitstream
    fn bits_to_plane(bits: &[u8]) -> Vec<f32> {
        bits.chunks_exact(BIT_DEPTH)
            .map(|word_bits| {
                let word = word_bits.iter().fold(0u16, |acc, &b| (acc << 1) | b as u16);
                (word as i16) as f32 / QUANT_MAX
            })
            .collect()
    }

    fn transmit(&self, plane: &[f32], rng: &mut StdRng) -> Vec<f32> {
        // Bit count is a multiple of 4 by construction (16 bits per word)
        let bits = Self::plane_to_bits(plane);

        let mut coded = Vec::with_capacity(bits.len() / 4 * 7);
        for chunk in bits.chunks_exact(4) {
            coded.extend(Self::encode_block([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }

        // Binary symmetric channel
        if self.error_rate > 0.0 {
            for bit in coded.iter_mut() {
                if rng.random_bool(self.error_rate) {
                    *bit ^= 1;
                }
            }
        }

        let mut decoded = Vec::with_capacity(bits.len());
        for chunk in coded.chunks_exact(7) {
            decoded.extend(Self::decode_block([
                chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6],
            ]));
        }

        Self::bits_to_plane(&decoded)
    }
}

impl Default for HammingCode {
    fn default() -> Self {
        HammingCode {
            error_rate: 1e-4,
            seed: 0,
        }
    }
}

impl super::Effect for HammingCode {
    fn name(&self) -> &'static str {
        "hamming(7,4) channel code"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| self.transmit(&plane, &mut rng))
            .collect();

        AudioBuffer::from_planes(planes, buffer.sample_rate())
    }
}
