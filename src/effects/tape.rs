//! Vintage tape emulation: compression, wow/flutter, saturation, and
//! high-frequency rolloff.

use crate::core::AudioBuffer;
use crate::effects::dsp::{Biquad, OnePole, db_to_linear, soft_clip};
use crate::error::AudioResult;

/// Vintage tape effect
#[derive(Clone, Debug)]
pub struct Tape {
    /// Wow/flutter modulation depth (fraction of the base delay, default 0.15)
    pub flutter: f32,
    /// Saturation drive in dB (default 3.0)
    pub drive_db: f32,
    /// Flutter LFO rate in Hz (default 1.5)
    pub flutter_rate_hz: f32,
    /// Compressor threshold in dBFS (default -10.0)
    pub threshold_db: f32,
    /// Compression ratio above the threshold (default 2.5)
    pub ratio: f32,
    /// Lowpass cutoff modelling the tape's limited bandwidth (default 12 kHz)
    pub cutoff_hz: f32,
}

impl Default for Tape {
    fn default() -> Self {
        Tape {
            flutter: 0.15,
            drive_db: 3.0,
            flutter_rate_hz: 1.5,
            threshold_db: -10.0,
            ratio: 2.5,
            cutoff_hz: 12_000.0,
        }
    }
}

impl Tape {
    /// Feedforward compression with a smoothed envelope follower
    fn compress(&self, plane: &mut [f32], sample_rate: f32) {
        let threshold = db_to_linear(self.threshold_db);
        // ~10 ms envelope smoothing
        let mut follower = OnePole::new(sample_rate, 16.0);

        for sample in plane {
            let envelope = follower.lowpass(sample.abs());
            if envelope > threshold {
                // Gain that maps the envelope onto the compressed curve
                let compressed = threshold * (envelope / threshold).powf(1.0 / self.ratio);
                *sample *= compressed / envelope;
            }
        }
    }

    /// Wow/flutter: an LFO-modulated fractional delay mixed with the dry path
    fn flutter(&self, plane: &[f32], sample_rate: f32) -> Vec<f32> {
        // Base delay of 8 ms; the LFO swings it by the flutter depth
        let base_delay = 0.008 * sample_rate;
        let lfo_step = std::f32::consts::TAU * self.flutter_rate_hz / sample_rate;

        let mut out = Vec::with_capacity(plane.len());

        for (i, &dry) in plane.iter().enumerate() {
            let lfo = (lfo_step * i as f32).sin();
            let delay = base_delay * (1.0 + self.flutter * lfo);
            let pos = i as f32 - delay;

            let wet = if pos < 0.0 {
                0.0
            } else {
                let idx = pos.floor() as usize;
                let frac = pos - idx as f32;
                let a = plane[idx];
                let b = if idx + 1 < plane.len() { plane[idx + 1] } else { a };
                a * (1.0 - frac) + b * frac
            };

            out.push(0.5 * dry + 0.5 * wet);
        }

        out
    }
}

impl super::Effect for Tape {
    fn name(&self) -> &'static str {
        "vintage tape"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let sample_rate = buffer.sample_rate() as f32;

        let planes = buffer
            .planes()
            .into_iter()
            .map(|mut plane| {
                self.compress(&mut plane, sample_rate);

                let mut plane = self.flutter(&plane, sample_rate);

                for sample in plane.iter_mut() {
                    *sample = soft_clip(*sample, self.drive_db);
                }

                let mut lowpass =
                    Biquad::lowpass(sample_rate, self.cutoff_hz, std::f32::consts::FRAC_1_SQRT_2);
                lowpass.process_plane(&mut plane);

                plane
            })
            .collect();

        AudioBuffer::from_planes(planes, buffer.sample_rate())
    }
}
