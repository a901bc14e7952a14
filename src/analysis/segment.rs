use crate::error::{AudioError, AudioResult};
use std::time::Duration;

/// Fixed-duration window segmentation over a mono sample stream
#[derive(Debug, Clone)]
pub struct Segmenter {
    duration: Duration,
    sample_rate: u32,
}

impl Segmenter {
    /// Create a segmenter producing windows of the given duration
    pub fn new(duration: Duration, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        if duration.is_zero() {
            return Err(AudioError::Config(
                "segment duration must be positive".to_string(),
            ));
        }

        Ok(Segmenter {
            duration,
            sample_rate,
        })
    }

    /// Number of samples per full segment
    pub fn samples_per_segment(&self) -> usize {
        (self.duration.as_secs_f64() * self.sample_rate as f64).ceil() as usize
    }

    /// Split samples into consecutive windows; the final window may be
    /// shorter but is never empty
    pub fn split<'a>(&self, samples: &'a [f32]) -> Vec<&'a [f32]> {
        samples.chunks(self.samples_per_segment()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmenter_creation() {
        let segmenter = Segmenter::new(Duration::from_secs(1), 44100).unwrap();
        assert_eq!(segmenter.samples_per_segment(), 44100);
    }

    #[test]
    fn test_segmenter_invalid_parameters() {
        assert!(Segmenter::new(Duration::from_secs(1), 0).is_err());
        assert!(Segmenter::new(Duration::ZERO, 44100).is_err());
    }

    #[test]
    fn test_split_exact_windows() {
        let segmenter = Segmenter::new(Duration::from_secs(1), 100).unwrap();
        let samples = vec![0.0f32; 300];

        let segments = segmenter.split(&samples);
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.len() == 100));
    }

    #[test]
    fn test_split_keeps_short_tail() {
        let segmenter = Segmenter::new(Duration::from_secs(1), 100).unwrap();
        let samples = vec![0.0f32; 250];

        let segments = segmenter.split(&samples);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].len(), 50);
    }

    #[test]
    fn test_sub_second_window() {
        let segmenter = Segmenter::new(Duration::from_millis(250), 16000).unwrap();
        assert_eq!(segmenter.samples_per_segment(), 4000);
    }
}
