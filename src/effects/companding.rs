//! A-law companding: compress, quantize uniformly, expand.
//!
//! Models the non-uniform quantization of PCM telephone systems. Disabling
//! the compandor degrades the chain to plain uniform quantization, which
//! makes the SNR benefit of companding measurable.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// A-law companding effect
#[derive(Clone, Debug)]
pub struct Companding {
    levels: f32,
    /// A-law parameter (87.6 in the European/Chinese standard)
    pub a: f32,
    /// When false, skip compression/expansion and quantize linearly
    pub enabled: bool,
}

impl Companding {
    /// Create a compandor quantizing at the given bit depth (1..=16)
    pub fn new(bit_depth: u32, enabled: bool) -> AudioResult<Self> {
        if bit_depth == 0 || bit_depth > 16 {
            return Err(AudioError::Config(format!(
                "bit depth must be in 1..=16, got {}",
                bit_depth
            )));
        }

        Ok(Companding {
            levels: (1u32 << bit_depth) as f32,
            a: 87.6,
            enabled,
        })
    }

    /// A-law compression curve F(x) for x in [-1, 1]
    fn compress(&self, x: f32) -> f32 {
        let sign = x.signum();
        let abs = x.abs();
        let denom = 1.0 + self.a.ln();

        let y = if abs < 1.0 / self.a {
            (self.a * abs) / denom
        } else {
            (1.0 + (self.a * abs).ln()) / denom
        };

        sign * y
    }

    /// A-law expansion, the inverse of [`Self::compress`]
    fn expand(&self, y: f32) -> f32 {
        let sign = y.signum();
        let abs = y.abs();
        let denom = 1.0 + self.a.ln();
        let threshold = 1.0 / denom;

        let x = if abs < threshold {
            (abs * denom) / self.a
        } else {
            (abs * denom - 1.0).exp() / self.a
        };

        sign * x
    }

    fn quantize(&self, x: f32) -> f32 {
        let normalized = (x + 1.0) / 2.0;
        let quantized = (normalized * self.levels).floor() / self.levels;
        quantized * 2.0 - 1.0
    }
}

impl Default for Companding {
    /// 8-bit A-law, the telephone-system configuration
    fn default() -> Self {
        Companding {
            levels: 256.0,
            a: 87.6,
            enabled: true,
        }
    }
}

impl super::Effect for Companding {
    fn name(&self) -> &'static str {
        "a-law companding"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        // Guard against inputs outside [-1, 1]; the curves assume unit range
        let peak = buffer
            .samples()
            .iter()
            .map(|s| s.abs())
            .fold(0.0f32, f32::max);
        let scale = if peak > 1.0 { 1.0 / peak } else { 1.0 };

        let samples = buffer
            .samples()
            .iter()
            .map(|&s| {
                let mut signal = s * scale;
                if self.enabled {
                    signal = self.compress(signal);
                }
                // The only lossy step; without it companding would be a no-op
                signal = self.quantize(signal);
                if self.enabled {
                    signal = self.expand(signal);
                }
                signal
            })
            .collect();

        AudioBuffer::new(samples, buffer.sample_rate(), buffer.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;
    use crate::effects::Effect;

    #[test]
    fn test_compress_expand_inverse() {
        let compandor = Companding::default();

        for x in [-0.9, -0.5, -0.01, 0.0, 0.003, 0.2, 0.7, 1.0] {
            let round_trip = compandor.expand(compandor.compress(x));
            assert!(
                (round_trip - x).abs() < 1e-4,
                "round trip of {} gave {}",
                x,
                round_trip
            );
        }
    }

    #[test]
    fn test_compression_boosts_small_signals() {
        let compandor = Companding::default();
        // A-law raises small amplitudes toward the quantizer's resolution
        assert!(compandor.compress(0.01) > 0.05);
        assert!(compandor.compress(1.0) <= 1.0 + 1e-6);
    }

    #[test]
    fn test_companding_beats_linear_on_quiet_audio() {
        // Quiet sine: companded quantization should preserve it better
        let rate = 8000u32;
        let samples: Vec<f32> = (0..rate as usize)
            .map(|i| (std::f32::consts::TAU * 200.0 * i as f32 / rate as f32).sin() * 0.02)
            .collect();
        let buffer = AudioBuffer::new(samples, rate, Channels::Mono).unwrap();

        let error_energy = |enabled: bool| {
            let out = Companding::new(8, enabled)
                .unwrap()
                .process(&buffer)
                .unwrap();
            buffer
                .samples()
                .iter()
                .zip(out.samples())
                .map(|(&x, &y)| (x - y).powi(2))
                .sum::<f32>()
        };

        assert!(error_energy(true) < error_energy(false));
    }

    #[test]
    fn test_deterministic() {
        let buffer = AudioBuffer::new(vec![0.1, -0.2, 0.3, -0.4], 8000, Channels::Mono).unwrap();
        let a = Companding::default().process(&buffer).unwrap();
        let b = Companding::default().process(&buffer).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
