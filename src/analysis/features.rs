//! Per-segment feature extraction

use crate::analysis::spectrum::{bin_frequency, magnitude_spectrum};
use serde::Serialize;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Derived features for one time segment.
///
/// The terminal artifact of an analysis run: one record per window, fully
/// determined by the window's samples and the sample rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    /// Zero-based segment index
    pub index: u32,
    /// Segment start offset in seconds
    pub start_secs: f64,
    /// Segment duration in seconds
    pub duration_secs: f64,
    /// Absolute peak amplitude
    pub peak: f32,
    /// Root-mean-square level
    pub rms: f32,
    /// Total energy (sum of squared samples)
    pub energy: f64,
    /// Fraction of adjacent sample pairs that change sign
    pub zero_crossing_rate: f32,
    /// Magnitude-weighted mean frequency, 0 for silence
    pub spectral_centroid_hz: f32,
}

/// Extract the feature record for one mono segment
pub fn extract(segment: &[f32], sample_rate: u32, index: u32, start_sample: usize)
-> FeatureRecord {
    let n = segment.len();

    let peak = segment.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    let energy: f64 = segment.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = if n == 0 {
        0.0
    } else {
        (energy / n as f64).sqrt() as f32
    };

    let crossings = segment
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    let zero_crossing_rate = if n > 1 {
        crossings as f32 / (n - 1) as f32
    } else {
        0.0
    };

    FeatureRecord {
        index,
        start_secs: start_sample as f64 / sample_rate as f64,
        duration_secs: n as f64 / sample_rate as f64,
        peak,
        rms,
        energy,
        zero_crossing_rate,
        spectral_centroid_hz: spectral_centroid(segment, sample_rate),
    }
}

/// Magnitude-weighted mean frequency of a segment
fn spectral_centroid(segment: &[f32], sample_rate: u32) -> f32 {
    let spectrum = magnitude_spectrum(segment);

    let total: f32 = spectrum.iter().sum();
    if total < EPSILON {
        return 0.0;
    }

    let weighted: f32 = spectrum
        .iter()
        .enumerate()
        .map(|(bin, &mag)| bin_frequency(bin, segment.len(), sample_rate) * mag)
        .sum();

    weighted / total
}
