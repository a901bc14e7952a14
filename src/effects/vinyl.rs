//! Vinyl record emulation: warm band-limiting plus impulse-noise crackle.

use crate::core::AudioBuffer;
use crate::effects::dsp::{Biquad, db_to_linear};
use crate::error::AudioResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Vinyl record effect
#[derive(Clone, Debug)]
pub struct Vinyl {
    /// Probability that any sample position carries a crackle (default 0.001)
    pub crackle_amount: f64,
    /// RNG seed for the crackle pattern
    pub seed: u64,
}

impl Default for Vinyl {
    fn default() -> Self {
        Vinyl {
            crackle_amount: 0.001,
            seed: 0,
        }
    }
}

impl super::Effect for Vinyl {
    fn name(&self) -> &'static str {
        "vinyl crackle"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate() as f32;
        let gain = db_to_linear(2.0);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|mut plane| {
                // Frequency response: cut the rumble, soften the top end
                let q = std::f32::consts::FRAC_1_SQRT_2;
                let mut highpass = Biquad::highpass(sample_rate, 30.0, q);
                let mut lowpass = Biquad::lowpass(sample_rate, 10_000.0, q);

                for sample in plane.iter_mut() {
                    *sample = lowpass.process(highpass.process(*sample)) * gain;
                }

                // Impulse noise: sparse random pops of random strength
                for sample in plane.iter_mut() {
                    if rng.random_bool(self.crackle_amount) {
                        *sample += rng.random_range(-0.1..0.1);
                    }
                }

                plane
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

    fn silent_buffer(seconds: f32, rate: u32) -> AudioBuffer {
        AudioBuffer::silent((seconds * rate as f32) as usize, rate, Channels::Mono).unwrap()
    }

    #[test]
    fn test_vinyl_preserves_shape() {
        let buffer = silent_buffer(1.0, 44100);
        let mut vinyl = Vinyl::default();
        let out = vinyl.process(&buffer).unwrap();

        assert_eq!(out.frames(), buffer.frames());
        assert_eq!(out.sample_rate(), buffer.sample_rate());
    }

    #[test]
    fn test_vinyl_injects_crackle_into_silence() {
        let buffer = silent_buffer(1.0, 44100);
        let mut vinyl = Vinyl::default();
        let out = vinyl.process(&buffer).unwrap();

        let crackles = out.samples().iter().filter(|s| s.abs() > 0.0).count();
        // Expect roughly crackle_amount * frames hits; allow a wide band
        assert!(
            crackles > 5 && crackles < 300,
            "unexpected crackle count {}",
            crackles
        );
    }

    #[test]
    fn test_vinyl_seed_reproducible() {
        let buffer = silent_buffer(0.5, 44100);

        let a = Vinyl { seed: 42, ..Vinyl::default() }
            .process(&buffer)
            .unwrap();
        let b = Vinyl { seed: 42, ..Vinyl::default() }
            .process(&buffer)
            .unwrap();
        let c = Vinyl { seed: 43, ..Vinyl::default() }
            .process(&buffer)
            .unwrap();

        assert_eq!(a.samples(), b.samples());
        assert_ne!(a.samples(), c.samples());
    }
}
