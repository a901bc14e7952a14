use crate::core::AudioBuffer;
use crate::effects::dsp::db_to_linear;
use crate::error::{AudioError, AudioResult};

/// Level normalizer - scales the buffer toward a target level in dBFS
#[derive(Clone, Debug)]
pub struct Normalize {
    /// Target level as a linear amplitude
    target: f32,
    /// Whether to measure RMS loudness (true) or the absolute peak (false)
    use_rms: bool,
}

impl Normalize {
    /// Create a peak normalizer targeting `target_db` dBFS
    pub fn peak_db(target_db: f32) -> AudioResult<Self> {
        Self::with_mode(target_db, false)
    }

    /// Create an RMS loudness normalizer targeting `target_db` dBFS
    pub fn rms_db(target_db: f32) -> AudioResult<Self> {
        Self::with_mode(target_db, true)
    }

    fn with_mode(target_db: f32, use_rms: bool) -> AudioResult<Self> {
        if target_db > 0.0 || !target_db.is_finite() {
            return Err(AudioError::Config(format!(
                "normalization target must be a finite level at or below 0 dBFS, got {}",
                target_db
            )));
        }

        Ok(Normalize {
            target: db_to_linear(target_db),
            use_rms,
        })
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().map(|&s| s.abs()).fold(0.0f32, f32::max)
    }

    fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_squared: f32 = samples.iter().map(|&s| s * s).sum();
        (sum_squared / samples.len() as f32).sqrt()
    }
}

impl Default for Normalize {
    /// Peak normalization to -1 dBFS, the original's safety headroom
    fn default() -> Self {
        Normalize {
            target: db_to_linear(-1.0),
            use_rms: false,
        }
    }
}

impl super::Effect for Normalize {
    fn name(&self) -> &'static str {
        "normalizer"
    }

    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer> {
        let samples = buffer.samples();

        if samples.is_empty() {
            return Ok(buffer.clone());
        }

        let current = if self.use_rms {
            Self::rms(samples)
        } else {
            Self::peak(samples)
        };

        // Silence has no level to scale
        if current == 0.0 {
            return Ok(buffer.clone());
        }

        let gain = self.target / current;
        let scaled = samples
            .iter()
            .map(|&s| (s * gain).clamp(-1.0, 1.0))
            .collect();

        AudioBuffer::new(scaled, buffer.sample_rate(), buffer.channels())
    }
}
