//! Convolution reverb with synthetic impulse responses.
//!
//! Convolves the signal with a generated impulse response via FFT (the LTI
//! "place the sound in a space" trick), then blends wet and dry paths.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::effects::dsp::gaussian;

/// Impulse response character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrKind {
    /// Long, chirping spring-tank decay
    Spring,
    /// Very short, dark small-box reflection
    OldRadio,
}

/// Convolution reverb effect
#[derive(Clone, Debug)]
pub struct ConvolutionReverb {
    /// Impulse response character (default spring)
    pub kind: IrKind,
    /// Wet/dry mix in [0, 1] (default 0.3)
    pub mix: f32,
    /// RNG seed for the synthetic impulse response
    pub seed: u64,
}

impl ConvolutionReverb {
    /// Create a reverb with the given impulse response and mix
    pub fn new(kind: IrKind, mix: f32) -> AudioResult<Self> {
        if !(0.0..=1.0).contains(&mix) {
            return Err(AudioError::Config(format!(
                "mix must be in [0, 1], got {}",
                mix
            )));
        }

        Ok(ConvolutionReverb { kind, mix, seed: 0 })
    }

    /// Generate the synthetic impulse response at the buffer's sample rate
    fn impulse_response(&self, sample_rate: f32, rng: &mut StdRng) -> Vec<f32> {
        let ir: Vec<f32> = match self.kind {
            IrKind::Spring => {
                // Noise carrier, rising chirp, exponential decay
                let len = (2.0 * sample_rate) as usize;
                (0..len)
                    .map(|i| {
                        let t = i as f32 / sample_rate;
                        let chirp = (std::f32::consts::TAU * 50.0 * t * t).sin();
                        gaussian(rng) * chirp * (-3.0 * t).exp()
                    })
                    .collect()
            }
            IrKind::OldRadio => {
                let len = (0.2 * sample_rate) as usize;
                (0..len)
                    .map(|i| {
                        let t = i as f32 / sample_rate;
                        gaussian(rng) * (-20.0 * t).exp()
                    })
                    .collect()
            }
        };

        let peak = ir.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        if peak > 0.0 {
            ir.into_iter().map(|s| s / peak).collect()
        } else {
            ir
        }
    }

    /// Full-length FFT convolution, truncated to the dry signal's length
    fn convolve(plane: &[f32], ir: &[f32]) -> Vec<f32> {
        if plane.is_empty() || ir.is_empty() {
            return plane.to_vec();
        }

        let n = (plane.len() + ir.len() - 1).next_power_of_two();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let ifft = planner.plan_fft_inverse(n);

        let mut a: Vec<Complex<f32>> = plane
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(n)
            .collect();
        let mut b: Vec<Complex<f32>> = ir
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(n)
            .collect();

        fft.process(&mut a);
        fft.process(&mut b);

        for (x, y) in a.iter_mut().zip(&b) {
            *x *= *y;
        }

        ifft.process(&mut a);

        a.iter()
            .take(plane.len())
            .map(|c| c.re / n as f32)
            .collect()
    }
}

impl Default for ConvolutionReverb {
    fn default() -> Self {
        ConvolutionReverb {
            kind: IrKind::Spring,
            mix: 0.3,
            seed: 0,
        }
    }
}

impl super::Effect for ConvolutionReverb {
    fn name(&self) -> &'static str {
        "convolution reverb"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let ir = self.impulse_response(buffer.sample_rate() as f32, &mut rng);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| {
                let wet = Self::convolve(&plane, &ir);

                let wet_peak = wet.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
                let wet_scale = 1.0 / (wet_peak + 1e-9);

                plane
                    .iter()
                    .zip(&wet)
                    .map(|(&dry, &w)| dry * (1.0 - self.mix) + w * wet_scale * self.mix)
                    .collect()
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

    #[test]
    fn test_rejects_invalid_mix() {
        assert!(ConvolutionReverb::new(IrKind::Spring, 1.5).is_err());
        assert!(ConvolutionReverb::new(IrKind::Spring, 0.3).is_ok());
    }

    #[test]
    fn test_convolve_with_unit_impulse_is_identity() {
        let plane = vec![0.5, -0.25, 0.1, 0.0, 0.75];
        let out = ConvolutionReverb::convolve(&plane, &[1.0]);

        assert_eq!(out.len(), plane.len());
        for (&x, &y) in plane.iter().zip(&out) {
            assert!((x - y).abs() < 1e-5, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_shape_preserved() {
        let buffer = AudioBuffer::silent(4410, 22050, Channels::Stereo).unwrap();
        let mut reverb = ConvolutionReverb {
            kind: IrKind::OldRadio,
            ..ConvolutionReverb::default()
        };
        let out = reverb.process(&buffer).unwrap();

        assert_eq!(out.frames(), buffer.frames());
        assert_eq!(out.channels(), buffer.channels());
    }

    #[test]
    fn test_impulse_gets_a_tail() {
        // A single click through the reverb must ring past the click
        let mut samples = vec![0.0f32; 11025];
        samples[0] = 1.0;
        let buffer = AudioBuffer::new(samples, 22050, Channels::Mono).unwrap();

        let mut reverb = ConvolutionReverb {
            kind: IrKind::OldRadio,
            mix: 0.5,
            seed: 1,
        };
        let out = reverb.process(&buffer).unwrap();

        let tail_energy: f32 = out.samples()[1000..4000].iter().map(|s| s * s).sum();
        assert!(tail_energy > 1e-6, "no reverb tail, energy {}", tail_energy);
    }

    #[test]
    fn test_zero_mix_is_dry() {
        let samples: Vec<f32> = (0..2205)
            .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / 22050.0).sin() * 0.5)
            .collect();
        let buffer = AudioBuffer::new(samples, 22050, Channels::Mono).unwrap();

        let mut reverb = ConvolutionReverb::new(IrKind::Spring, 0.0).unwrap();
        let out = reverb.process(&buffer).unwrap();

        for (&x, &y) in buffer.samples().iter().zip(out.samples()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let buffer = AudioBuffer::silent(2205, 22050, Channels::Mono).unwrap();
        let a = ConvolutionReverb::default().process(&buffer).unwrap();
        let b = ConvolutionReverb::default().process(&buffer).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
