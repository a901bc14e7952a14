//! AM modulation/demodulation chain.
//!
//! Runs the full transmit path - pre-emphasis, carrier modulation, channel
//! noise - and the matching receive path. Standard AM demodulates with an
//! envelope detector; DSB-SC uses coherent detection against the shared
//! carrier oscillator.

use crate::core::AudioBuffer;
use crate::effects::dsp::{Biquad, OnePole, gaussian};
use crate::error::{AudioError, AudioResult};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// AM modulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmMode {
    /// Standard AM: carrier plus both sidebands, envelope detection
    Standard,
    /// Double-sideband suppressed carrier, coherent detection
    DsbSc,
}

/// AM modulation effect
#[derive(Clone, Debug)]
pub struct AmRadio {
    /// Carrier frequency in Hz (default 10 kHz)
    pub carrier_hz: f32,
    /// Modulation index in (0, 1] (default 0.7)
    pub modulation_index: f32,
    /// Modulation mode (default standard)
    pub mode: AmMode,
    /// Channel SNR in dB for the injected noise (default 35)
    pub noise_snr_db: f32,
    /// Apply pre-/de-emphasis around the channel (default true)
    pub pre_emphasis: bool,
    /// Carrier synchronization tolerance as a frequency fraction (default 0.01)
    pub sync_tolerance: f32,
    /// RNG seed for carrier offsets and channel noise
    pub seed: u64,
}

impl AmRadio {
    /// Create an AM chain in the given mode
    pub fn new(mode: AmMode, carrier_hz: f32, modulation_index: f32) -> AudioResult<Self> {
        if !(0.0..=1.0).contains(&modulation_index) || modulation_index == 0.0 {
            return Err(AudioError::Config(format!(
                "modulation index must be in (0, 1], got {}",
                modulation_index
            )));
        }

        if carrier_hz <= 0.0 {
            return Err(AudioError::Config(format!(
                "carrier frequency must be positive, got {}",
                carrier_hz
            )));
        }

        Ok(AmRadio {
            carrier_hz,
            modulation_index,
            mode,
            ..AmRadio::default()
        })
    }

    fn peak_normalize(plane: &mut [f32]) {
        let peak = plane.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        if peak > 0.0 {
            for sample in plane.iter_mut() {
                *sample /= peak;
            }
        }
    }

    /// Carrier with a small random frequency/phase error, modelling imperfect
    /// oscillator sync
    fn carrier(&self, len: usize, sample_rate: f32, rng: &mut StdRng) -> Vec<f32> {
        let freq_offset = self.carrier_hz * self.sync_tolerance * rng.random_range(-1.0..1.0f32);
        let phase_offset = rng.random_range(0.0..std::f32::consts::TAU);
        let step = std::f32::consts::TAU * (self.carrier_hz + freq_offset) / sample_rate;

        (0..len)
            .map(|i| (step * i as f32 + phase_offset).cos())
            .collect()
    }

    fn transmit(&self, plane: &[f32], carrier: &[f32], rng: &mut StdRng) -> Vec<f32> {
        let mut modulated: Vec<f32> = match self.mode {
            AmMode::Standard => plane
                .iter()
                .zip(carrier)
                .map(|(&x, &c)| (1.0 + self.modulation_index * x) * c)
                .collect(),
            AmMode::DsbSc => plane
                .iter()
                .zip(carrier)
                .map(|(&x, &c)| self.modulation_index * x * c)
                .collect(),
        };

        // Additive white Gaussian noise scaled to the configured channel SNR
        let signal_power =
            modulated.iter().map(|s| s * s).sum::<f32>() / modulated.len().max(1) as f32;
        let noise_power = signal_power / 10.0_f32.powf(self.noise_snr_db / 10.0);
        let noise_amp = noise_power.sqrt();

        for sample in modulated.iter_mut() {
            *sample += noise_amp * gaussian(rng);
        }

        modulated
    }

    fn receive(&self, modulated: &[f32], carrier: &[f32], sample_rate: f32) -> Vec<f32> {
        let q = std::f32::consts::FRAC_1_SQRT_2;
        let mut lowpass = Biquad::lowpass(sample_rate, 5000.0, q);

        match self.mode {
            AmMode::Standard => {
                // Envelope detection: rectify, lowpass, remove the DC term
                let mut demodulated: Vec<f32> = modulated
                    .iter()
                    .map(|&y| lowpass.process(y.abs()))
                    .collect();

                let mean =
                    demodulated.iter().sum::<f32>() / demodulated.len().max(1) as f32;
                for sample in demodulated.iter_mut() {
                    *sample -= mean;
                }
                demodulated
            }
            AmMode::DsbSc => {
                // Coherent detection against the shared oscillator
                let gain = 2.0 / self.modulation_index;
                modulated
                    .iter()
                    .zip(carrier)
                    .map(|(&y, &c)| lowpass.process(y * c) * gain)
                    .collect()
            }
        }
    }
}

impl Default for AmRadio {
    fn default() -> Self {
        AmRadio {
            carrier_hz: 10_000.0,
            modulation_index: 0.7,
            mode: AmMode::Standard,
            noise_snr_db: 35.0,
            pre_emphasis: true,
            sync_tolerance: 0.01,
            seed: 0,
        }
    }
}

impl super::Effect for AmRadio {
    fn name(&self) -> &'static str {
        "am modulation"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate() as f32;

        if self.carrier_hz >= sample_rate / 2.0 {
            return Err(AudioError::Config(format!(
                "carrier at {} Hz exceeds the Nyquist limit of a {} Hz stream",
                self.carrier_hz, buffer.sample_rate()
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);

        let planes = buffer
            .planes()
            .into_iter()
            .map(|mut plane| {
                Self::peak_normalize(&mut plane);

                if self.pre_emphasis {
                    let mut emphasis = OnePole::new(sample_rate, 3000.0);
                    for sample in plane.iter_mut() {
                        *sample = emphasis.highpass(*sample);
                    }
                }

                let carrier = self.carrier(plane.len(), sample_rate, &mut rng);
                let modulated = self.transmit(&plane, &carrier, &mut rng);
                let mut demodulated = self.receive(&modulated, &carrier, sample_rate);

                if self.pre_emphasis {
                    let mut deemphasis = OnePole::new(sample_rate, 3000.0);
                    for sample in demodulated.iter_mut() {
                        *sample = deemphasis.lowpass(*sample);
                    }
                }

                Self::peak_normalize(&mut demodulated);
                demodulated
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

    fn sine_buffer(freq: f32, seconds: f32, rate: u32) -> AudioBuffer {
        let n = (seconds * rate as f32) as usize;
        let samples = (0..n)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / rate as f32).sin() * 0.6)
            .collect();
        AudioBuffer::new(samples, rate, Channels::Mono).unwrap()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(AmRadio::new(AmMode::Standard, 10_000.0, 0.0).is_err());
        assert!(AmRadio::new(AmMode::Standard, 10_000.0, 1.5).is_err());
        assert!(AmRadio::new(AmMode::Standard, -5.0, 0.7).is_err());
    }

    #[test]
    fn test_carrier_above_nyquist_fails() {
        let buffer = sine_buffer(440.0, 0.1, 8000);
        let mut am = AmRadio::default(); // 10 kHz carrier, 4 kHz Nyquist
        assert!(am.process(&buffer).is_err());
    }

    #[test]
    fn test_shape_preserved() {
        let buffer = sine_buffer(440.0, 0.5, 44100);
        let mut am = AmRadio::default();
        let out = am.process(&buffer).unwrap();

        assert_eq!(out.frames(), buffer.frames());
        assert_eq!(out.sample_rate(), buffer.sample_rate());
    }

    #[test]
    fn test_output_normalized() {
        let buffer = sine_buffer(440.0, 0.25, 44100);
        let mut am = AmRadio::default();
        let out = am.process(&buffer).unwrap();

        let peak = out.samples().iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(peak <= 1.0 + 1e-6);
        assert!(peak > 0.5, "demodulated signal vanished, peak {}", peak);
    }

    #[test]
    fn test_standard_am_recovers_tone() {
        // A 440 Hz tone should survive the modulate/demodulate round trip:
        // the demodulated signal must correlate strongly with the input.
        let rate = 44100u32;
        let buffer = sine_buffer(440.0, 0.5, rate);
        let mut am = AmRadio {
            noise_snr_db: 60.0,
            sync_tolerance: 0.0,
            pre_emphasis: false,
            ..AmRadio::default()
        };
        let out = am.process(&buffer).unwrap();

        // Skip the filter settling region
        let skip = 2000;
        let x = &buffer.samples()[skip..];
        let y = &out.samples()[skip..];

        let dot: f32 = x.iter().zip(y).map(|(a, b)| a * b).sum();
        let nx: f32 = x.iter().map(|a| a * a).sum::<f32>().sqrt();
        let ny: f32 = y.iter().map(|b| b * b).sum::<f32>().sqrt();
        let correlation = (dot / (nx * ny)).abs();

        assert!(
            correlation > 0.8,
            "demodulated tone poorly correlated: {}",
            correlation
        );
    }

    #[test]
    fn test_dsb_sc_mode_runs() {
        let buffer = sine_buffer(440.0, 0.25, 44100);
        let mut am = AmRadio {
            mode: AmMode::DsbSc,
            ..AmRadio::default()
        };
        let out = am.process(&buffer).unwrap();
        assert_eq!(out.frames(), buffer.frames());
    }

    #[test]
    fn test_seed_reproducible() {
        let buffer = sine_buffer(440.0, 0.1, 44100);
        let a = AmRadio::default().process(&buffer).unwrap();
        let b = AmRadio::default().process(&buffer).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
