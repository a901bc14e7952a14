//! Old AM-radio character: telephone-band limiting, receiver overdrive, and
//! additive white Gaussian channel noise.

use crate::core::AudioBuffer;
use crate::effects::dsp::{Biquad, gaussian, soft_clip};
use crate::error::AudioResult;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// AM radio style effect
#[derive(Clone, Debug)]
pub struct Radio {
    /// White noise standard deviation (default 0.015)
    pub noise_level: f32,
    /// Overdrive in dB (default 10.0)
    pub drive_db: f32,
    /// RNG seed for the channel noise
    pub seed: u64,
}

impl Default for Radio {
    fn default() -> Self {
        Radio {
            noise_level: 0.015,
            drive_db: 10.0,
            seed: 0,
        }
    }
}

impl super::Effect for Radio {
    fn name(&self) -> &'static str {
        "am radio style"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate() as f32;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|mut plane| {
                // Telephone band: 300 Hz - 3.4 kHz
                let q = std::f32::consts::FRAC_1_SQRT_2;
                let mut highpass = Biquad::highpass(sample_rate, 300.0, q);
                let mut lowpass = Biquad::lowpass(sample_rate, 3400.0, q);

                for sample in plane.iter_mut() {
                    let band_limited = lowpass.process(highpass.process(*sample));
                    *sample = soft_clip(band_limited, self.drive_db)
                        + self.noise_level * gaussian(&mut rng);
                }

                plane
            })
            .collect();

        AudioBuffer::from_planes(planes, buffer.sample_rate())
    }
}
