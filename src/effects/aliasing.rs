//! Sample-rate reduction with deliberate aliasing.
//!
//! Decimates to a lower rate (the ADC) and reconstructs with zero-order hold
//! (the DAC). With `obey_nyquist` set, anti-alias and reconstruction lowpass
//! stages bracket the conversion and the artifacts disappear; without it the
//! aliased spectrum folds audibly into the output.

use crate::core::AudioBuffer;
use crate::effects::dsp::Biquad;
use crate::error::{AudioError, AudioResult};

/// Aliasing resampler effect
#[derive(Clone, Debug)]
pub struct Aliasing {
    /// Simulated converter rate in Hz (default 4000)
    pub target_rate: u32,
    /// Apply anti-alias/reconstruction filtering (default false)
    pub obey_nyquist: bool,
}

impl Aliasing {
    /// Create an aliasing resampler targeting the given rate
    pub fn new(target_rate: u32, obey_nyquist: bool) -> AudioResult<Self> {
        if target_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        Ok(Aliasing {
            target_rate,
            obey_nyquist,
        })
    }

    fn nyquist_filter(&self, sample_rate: f32) -> Biquad {
        // Cut just below the simulated converter's Nyquist frequency
        let cutoff = self.target_rate as f32 / 2.0 * 0.9;
        Biquad::lowpass(sample_rate, cutoff, std::f32::consts::FRAC_1_SQRT_2)
    }
}

impl Default for Aliasing {
    fn default() -> Self {
        Aliasing {
            target_rate: 4000,
            obey_nyquist: false,
        }
    }
}

impl super::Effect for Aliasing {
    fn name(&self) -> &'static str {
        "aliasing resampler"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate();

        if self.target_rate >= sample_rate {
            return Ok(buffer.clone());
        }

        let step = (sample_rate / self.target_rate) as usize;
        if step <= 1 {
            return Ok(buffer.clone());
        }

        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| {
                let original_len = plane.len();

                let mut stage = plane;
                if self.obey_nyquist {
                    self.nyquist_filter(sample_rate as f32)
                        .process_plane(&mut stage);
                }

                // ADC: keep every step-th sample; DAC: hold each value
                let mut held = Vec::with_capacity(original_len + step);
                for &sample in stage.iter().step_by(step) {
                    held.extend(std::iter::repeat_n(sample, step));
                }

                // Hold extension rounds up; trim or edge-pad back to length
                match held.len().cmp(&original_len) {
                    std::cmp::Ordering::Greater => held.truncate(original_len),
                    std::cmp::Ordering::Less => {
                        let edge = held.last().copied().unwrap_or(0.0);
                        held.resize(original_len, edge);
                    }
                    std::cmp::Ordering::Equal => {}
                }

                if self.obey_nyquist {
                    self.nyquist_filter(sample_rate as f32).process_plane(&mut held);
                }

                held
            })
            .collect();

        AudioBuffer::from_planes(planes, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;
    use crate::effects::Effect;

    fn sine_buffer(freq: f32, seconds: f32, rate: u32) -> AudioBuffer {
        let n = (seconds * rate as f32) as usize;
        let samples = (0..n)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / rate as f32).sin() * 0.5)
            .collect();
        AudioBuffer::new(samples, rate, Channels::Mono).unwrap()
    }

    #[test]
    fn test_rejects_zero_rate() {
        assert!(Aliasing::new(0, false).is_err());
    }

    #[test]
    fn test_length_preserved() {
        let buffer = sine_buffer(440.0, 0.33, 44100);
        let mut aliasing = Aliasing::default();
        let out = aliasing.process(&buffer).unwrap();

        assert_eq!(out.frames(), buffer.frames());
        assert_eq!(out.sample_rate(), buffer.sample_rate());
    }

    #[test]
    fn test_target_above_input_passes_through() {
        let buffer = sine_buffer(440.0, 0.1, 8000);
        let mut aliasing = Aliasing::new(48000, false).unwrap();
        let out = aliasing.process(&buffer).unwrap();
        assert_eq!(out.samples(), buffer.samples());
    }

    #[test]
    fn test_zero_order_hold_repeats_values() {
        let buffer = AudioBuffer::new(
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
            8000,
            Channels::Mono,
        )
        .unwrap();
        // step = 8000 / 2000 = 4
        let mut aliasing = Aliasing::new(2000, false).unwrap();
        let out = aliasing.process(&buffer).unwrap();

        assert_eq!(
            out.samples(),
            &[0.1, 0.1, 0.1, 0.1, 0.5, 0.5, 0.5, 0.5]
        );
    }

    #[test]
    fn test_nyquist_filtering_reduces_energy_above_cutoff() {
        // 3 kHz tone, above the 2 kHz Nyquist of a 4 kHz converter
        let buffer = sine_buffer(3000.0, 0.5, 44100);

        let mut aliased = Aliasing::new(4000, false).unwrap();
        let mut filtered = Aliasing::new(4000, true).unwrap();

        let energy = |b: &AudioBuffer| b.samples().iter().map(|s| s * s).sum::<f32>();

        let raw = aliased.process(&buffer).unwrap();
        let clean = filtered.process(&buffer).unwrap();

        // The filtered path removes the out-of-band tone before it can fold
        assert!(energy(&clean) < energy(&raw) * 0.5);
    }

    #[test]
    fn test_deterministic() {
        let buffer = sine_buffer(440.0, 0.2, 44100);
        let a = Aliasing::default().process(&buffer).unwrap();
        let b = Aliasing::default().process(&buffer).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
