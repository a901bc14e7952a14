//! 2-FSK transmission chain.
//!
//! The audio is thresholded into a bitstream, keyed onto two carrier tones,
//! demodulated by comparing per-band energies, and the recovered bits are
//! mapped back onto the original waveform as amplitude keying. The audible
//! result preserves the source but carries the granularity of the bit clock.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// FSK modulation/demodulation effect
#[derive(Clone, Debug)]
pub struct FskCodec {
    /// Carrier frequency for a 0 bit in Hz (default 1000)
    pub freq0: f32,
    /// Carrier frequency for a 1 bit in Hz (default 2000)
    pub freq1: f32,
    /// Bit rate in bits per second (default 100)
    pub bit_rate: u32,
    /// Carrier amplitude (default 0.5)
    pub carrier_amp: f32,
}

impl FskCodec {
    /// Create an FSK codec with the given carrier pair and bit rate
    pub fn new(freq0: f32, freq1: f32, bit_rate: u32) -> AudioResult<Self> {
        if bit_rate == 0 {
            return Err(AudioError::Config("bit rate must be positive".to_string()));
        }

        if freq0 <= 0.0 || freq1 <= 0.0 || (freq0 - freq1).abs() < f32::EPSILON {
            return Err(AudioError::Config(format!(
                "carrier frequencies must be positive and distinct, got {} and {}",
                freq0, freq1
            )));
        }

        Ok(FskCodec {
            freq0,
            freq1,
            bit_rate,
            carrier_amp: 0.5,
        })
    }

    /// Threshold the waveform into bits: one bit per `samples_per_bit` chunk,
    /// high when the chunk's mean amplitude clears 10% of the peak
    fn waveform_to_bits(plane: &[f32], samples_per_bit: usize) -> Vec<bool> {
        let peak = plane.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let threshold = peak * 0.1;

        plane
            .chunks_exact(samples_per_bit)
            .map(|chunk| {
                let mean = chunk.iter().map(|s| s.abs()).sum::<f32>() / chunk.len() as f32;
                mean > threshold
            })
            .collect()
    }

    /// Key each bit onto its carrier tone
    fn modulate(&self, bits: &[bool], samples_per_bit: usize, sample_rate: f32, len: usize)
    -> Vec<f32> {
        let tone = |freq: f32| -> Vec<f32> {
            (0..samples_per_bit)
                .map(|i| {
                    self.carrier_amp
                        * (std::f32::consts::TAU * freq * i as f32 / sample_rate).sin()
                })
                .collect()
        };
        let tone0 = tone(self.freq0);
        let tone1 = tone(self.freq1);

        let mut modulated = Vec::with_capacity(len);
        for &bit in bits {
            modulated.extend_from_slice(if bit { &tone1 } else { &tone0 });
        }
        modulated.resize(len, 0.0);
        modulated
    }

    /// Recover bits by comparing the energy in each carrier's band
    fn demodulate(&self, modulated: &[f32], samples_per_bit: usize, sample_rate: f32)
    -> Vec<bool> {
        use crate::effects::dsp::Biquad;

        // 100 Hz bands around each carrier
        let mut band0 = Biquad::bandpass(sample_rate, self.freq0, self.freq0 / 100.0);
        let mut band1 = Biquad::bandpass(sample_rate, self.freq1, self.freq1 / 100.0);

        let filtered0: Vec<f32> = modulated.iter().map(|&s| band0.process(s)).collect();
        let filtered1: Vec<f32> = modulated.iter().map(|&s| band1.process(s)).collect();

        let num_bits = modulated.len() / samples_per_bit;
        (0..num_bits)
            .map(|i| {
                let start = i * samples_per_bit;
                let end = start + samples_per_bit;
                let energy0: f32 = filtered0[start..end].iter().map(|s| s * s).sum();
                let energy1: f32 = filtered1[start..end].iter().map(|s| s * s).sum();
                energy1 > energy0
            })
            .collect()
    }

    /// Amplitude-key the recovered bits back onto the source waveform
    fn reconstruct(plane: &[f32], bits: &[bool], samples_per_bit: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(plane.len());

        for (i, &bit) in bits.iter().enumerate() {
            let start = i * samples_per_bit;
            let end = start + samples_per_bit;
            if end > plane.len() {
                break;
            }
            let gain = if bit { 1.2 } else { 0.8 };
            out.extend(plane[start..end].iter().map(|&s| s * gain));
        }

        out.resize(plane.len(), 0.0);
        out
    }
}

impl Default for FskCodec {
    fn default() -> Self {
        FskCodec {
            freq0: 1000.0,
            freq1: 2000.0,
            bit_rate: 100,
            carrier_amp: 0.5,
        }
    }
}

impl super::Effect for FskCodec {
    fn name(&self) -> &'static str {
        "fsk codec"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate() as f32;
        let samples_per_bit = (buffer.sample_rate() / self.bit_rate) as usize;

        if samples_per_bit == 0 {
            return Err(AudioError::Config(format!(
                "bit rate {} exceeds the sample rate {}",
                self.bit_rate,
                buffer.sample_rate()
            )));
        }

        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| {
                let bits = Self::waveform_to_bits(&plane, samples_per_bit);
                let modulated =
                    self.modulate(&bits, samples_per_bit, sample_rate, plane.len());
                let recovered = self.demodulate(&modulated, samples_per_bit, sample_rate);
                Self::reconstruct(&plane, &recovered, samples_per_bit)
            })
            .collect();

        AudioBuffer::from_planes(planes, buffer.sample_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;
    use crate::effects::Effect;

    fn tone_with_gaps(rate: u32) -> AudioBuffer {
        // Alternating loud and silent 50 ms stretches
        let chunk = rate as usize / 20;
        let mut samples = Vec::new();
        for block in 0..20 {
            for i in 0..chunk {
                let v = if block % 2 == 0 {
                    (std::f32::consts::TAU * 440.0 * i as f32 / rate as f32).sin() * 0.8
                } else {
                    0.0
                };
                samples.push(v);
            }
        }
        AudioBuffer::new(samples, rate, Channels::Mono).unwrap()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(FskCodec::new(1000.0, 2000.0, 0).is_err());
        assert!(FskCodec::new(1000.0, 1000.0, 100).is_err());
        assert!(FskCodec::new(-1.0, 2000.0, 100).is_err());
    }

    #[test]
    fn test_modem_round_trip_recovers_bits() {
        let codec = FskCodec::default();
        let rate = 44100.0;
        let samples_per_bit = 441;

        let bits = vec![true, false, true, true, false, false, true, false];
        let modulated = codec.modulate(&bits, samples_per_bit, rate, bits.len() * samples_per_bit);
        let recovered = codec.demodulate(&modulated, samples_per_bit, rate);

        assert_eq!(bits, recovered);
    }

    #[test]
    fn test_length_preserved() {
        let buffer = tone_with_gaps(44100);
        let mut codec = FskCodec::default();
        let out = codec.process(&buffer).unwrap();

        assert_eq!(out.frames(), buffer.frames());
        assert_eq!(out.sample_rate(), buffer.sample_rate());
    }

    #[test]
    fn test_loud_sections_boosted_quiet_kept_low() {
        let buffer = tone_with_gaps(44100);
        let mut codec = FskCodec::default();
        let out = codec.process(&buffer).unwrap();

        // Loud stretches carry 1-bits and come back amplified
        let in_peak = buffer.samples()[..2205]
            .iter()
            .map(|s| s.abs())
            .fold(0.0f32, f32::max);
        let out_peak = out.samples()[..2205]
            .iter()
            .map(|s| s.abs())
            .fold(0.0f32, f32::max);
        assert!(out_peak > in_peak * 1.1);
    }

    #[test]
    fn test_bit_rate_above_sample_rate_fails() {
        let buffer = tone_with_gaps(8000);
        let mut codec = FskCodec {
            bit_rate: 16_000,
            ..FskCodec::default()
        };
        assert!(codec.process(&buffer).is_err());
    }

    #[test]
    fn test_deterministic() {
        let buffer = tone_with_gaps(44100);
        let a = FskCodec::default().process(&buffer).unwrap();
        let b = FskCodec::default().process(&buffer).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
