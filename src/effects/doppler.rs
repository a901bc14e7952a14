//! Doppler shift via FFT-domain frequency scaling.
//!
//! The signal is oversampled for headroom, its positive-frequency bins are
//! remapped by the Doppler factor `c / (c - v)` under a Nyquist guard mask,
//! the spectrum is mirrored to stay Hermitian, and the result is decimated
//! back to the original rate.

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Doppler shift effect
#[derive(Clone, Debug)]
pub struct Doppler {
    /// Relative source speed in m/s, positive = approaching (default 30)
    pub speed: f32,
    /// Speed of sound in m/s (default 343)
    pub sound_speed: f32,
    /// Oversampling factor, 1 disables (default 4)
    pub oversample: usize,
    /// Frequency band eligible for shifting, in Hz (default 20..15000)
    pub freq_range: (f32, f32),
}

impl Doppler {
    /// Create a Doppler effect for the given relative speed
    pub fn new(speed: f32) -> AudioResult<Self> {
        if speed.abs() > 100.0 {
            return Err(AudioError::Config(format!(
                "relative speed must be within +/-100 m/s, got {}",
                speed
            )));
        }

        Ok(Doppler {
            speed,
            ..Doppler::default()
        })
    }

    fn factor(&self) -> f32 {
        self.sound_speed / (self.sound_speed - self.speed)
    }

    /// Windowed-sinc lowpass taps (Hamming window), DC gain 1.
    /// `cutoff` is normalized to Nyquist.
    fn fir_lowpass(num_taps: usize, cutoff: f32) -> Vec<f32> {
        let m = (num_taps - 1) as f32 / 2.0;

        let mut taps: Vec<f32> = (0..num_taps)
            .map(|n| {
                let x = n as f32 - m;
                let sinc = if x.abs() < f32::EPSILON {
                    cutoff
                } else {
                    (std::f32::consts::PI * cutoff * x).sin() / (std::f32::consts::PI * x)
                };
                let window = 0.54
                    - 0.46
                        * (std::f32::consts::TAU * n as f32 / (num_taps - 1) as f32).cos();
                sinc * window
            })
            .collect();

        let sum: f32 = taps.iter().sum();
        for tap in taps.iter_mut() {
            *tap /= sum;
        }
        taps
    }

    /// Zero-stuff by the oversampling factor, then filter out the images
    fn upsample(&self, plane: &[f32]) -> Vec<f32> {
        let l = self.oversample;
        let mut stuffed = vec![0.0f32; plane.len() * l];
        for (i, &sample) in plane.iter().enumerate() {
            stuffed[i * l] = sample;
        }

        let taps = Self::fir_lowpass(31, 1.0 / l as f32);
        let mut filtered = vec![0.0f32; stuffed.len()];
        for (n, out) in filtered.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                if n >= k {
                    acc += tap * stuffed[n - k];
                }
            }
            // Interpolation gain compensates the stuffed zeros
            *out = acc * l as f32;
        }

        filtered
    }

    /// Remap positive-frequency bins by the Doppler factor
    fn shift(&self, plane: &[f32], sample_rate: f32) -> Vec<f32> {
        let n = plane.len();
        if n == 0 {
            return Vec::new();
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let ifft = planner.plan_fft_inverse(n);

        let mut spectrum: Vec<Complex<f32>> =
            plane.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut spectrum);

        let factor = self.factor();
        let nyquist = sample_rate / 2.0;
        let df = sample_rate / n as f32;

        let lower = self.freq_range.0.max(20.0);
        let mut upper = self.freq_range.1.min(nyquist - 1.0);
        // Keep the shifted band below Nyquist
        if upper * factor > nyquist {
            upper = nyquist / factor;
        }

        let half = n / 2;
        let mut shifted = vec![Complex::new(0.0f32, 0.0); n];

        for i in 0..=half {
            let freq = i as f32 * df;
            if freq < lower || freq > upper {
                continue;
            }
            let j = (i as f32 * factor).round() as usize;
            if j <= half {
                shifted[j] = spectrum[i];
            }
        }

        // Mirror so the inverse transform is real
        for j in 1..half {
            shifted[n - j] = shifted[j].conj();
        }

        ifft.process(&mut shifted);

        shifted.iter().map(|c| c.re / n as f32).collect()
    }
}

impl Default for Doppler {
    fn default() -> Self {
        Doppler {
            speed: 30.0,
            sound_speed: 343.0,
            oversample: 4,
            freq_range: (20.0, 15_000.0),
        }
    }
}

impl super::Effect for Doppler {
    fn name(&self) -> &'static str {
        "doppler shift"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        if self.speed >= self.sound_speed {
            return Err(AudioError::Config(format!(
                "relative speed {} m/s must stay below the speed of sound",
                self.speed
            )));
        }

        let sample_rate = buffer.sample_rate() as f32;
        let l = self.oversample.max(1);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|plane| {
                if l > 1 {
                    let upsampled = self.upsample(&plane);
                    let shifted = self.shift(&upsampled, sample_rate * l as f32);
                    shifted.into_iter().step_by(l).collect()
                } else {
                    self.shift(&plane, sample_rate)
                }
            })
            .collect();

        AudioBuffer::from_planes(planes, buffer.sample_rate())
    }
}
