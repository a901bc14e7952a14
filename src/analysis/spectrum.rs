//! Single-sided FFT magnitude spectrum

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Single-sided magnitude spectrum of a mono sample window.
///
/// Returns one magnitude per bin from DC up to (and including) Nyquist,
/// scaled by 2/N so a full-scale sine reads close to its amplitude.
pub fn magnitude_spectrum(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> =
        samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let scale = 2.0 / n as f32;
    buffer[..=n / 2].iter().map(|c| c.norm() * scale).collect()
}

/// Center frequency of a spectrum bin
pub fn bin_frequency(bin: usize, window_len: usize, sample_rate: u32) -> f32 {
    bin as f32 * sample_rate as f32 / window_len as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(magnitude_spectrum(&[]).is_empty());
    }

    #[test]
    fn test_sine_peak_at_tone_bin() {
        let rate = 8000u32;
        let n = 8000usize;
        let freq = 1000.0f32;

        let samples: Vec<f32> = (0..n)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / rate as f32).sin())
            .collect();

        let spectrum = magnitude_spectrum(&samples);
        assert_eq!(spectrum.len(), n / 2 + 1);

        let peak_bin = (0..spectrum.len())
            .max_by(|&a, &b| spectrum[a].partial_cmp(&spectrum[b]).unwrap())
            .unwrap();

        assert_eq!(bin_frequency(peak_bin, n, rate), 1000.0);
        // 2/N scaling puts a unit sine near magnitude 1
        assert!((spectrum[peak_bin] - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_silence_is_flat_zero() {
        let spectrum = magnitude_spectrum(&vec![0.0f32; 1024]);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }
}
