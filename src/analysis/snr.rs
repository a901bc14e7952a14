//! Signal-to-noise ratio between an original and a processed signal

/// Noise power below this is treated as a perfect reproduction
const NOISE_FLOOR: f64 = 1e-10;

/// SNR in dB of `processed` against `original`.
///
/// The noise is the sample-wise difference over the overlapping prefix
/// (`SNR = 10 log10(P_signal / P_noise)`). Returns positive infinity when
/// the residual power sits below the noise floor.
pub fn snr_db(original: &[f32], processed: &[f32]) -> f64 {
    let len = original.len().min(processed.len());

    let mut p_signal = 0.0f64;
    let mut p_noise = 0.0f64;

    for i in 0..len {
        let x = original[i] as f64;
        let noise = x - processed[i] as f64;
        p_signal += x * x;
        p_noise += noise * noise;
    }

    if p_noise < NOISE_FLOOR {
        return f64::INFINITY;
    }

    10.0 * (p_signal / p_noise).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_signals_infinite_snr() {
        let signal = vec![0.5f32, -0.25, 0.75, 0.0];
        assert_eq!(snr_db(&signal, &signal), f64::INFINITY);
    }

    #[test]
    fn test_known_noise_level() {
        // Signal amplitude 1.0, noise amplitude 0.1 -> 20 dB
        let n = 1000;
        let original: Vec<f32> = (0..n)
            .map(|i| (std::f32::consts::TAU * 50.0 * i as f32 / 1000.0).sin())
            .collect();
        let processed: Vec<f32> = original
            .iter()
            .enumerate()
            .map(|(i, &x)| x + 0.1 * (std::f32::consts::TAU * 333.0 * i as f32 / 1000.0).sin())
            .collect();

        let snr = snr_db(&original, &processed);
        assert!((snr - 20.0).abs() < 1.0, "snr {}", snr);
    }

    #[test]
    fn test_length_mismatch_truncates() {
        let original = vec![0.5f32; 100];
        let mut processed = vec![0.5f32; 80];
        processed.extend([9.9f32; 20]); // garbage past the overlap of the shorter input

        // Only the first 80 samples of `original` are compared against the
        // valid prefix
        assert_eq!(snr_db(&original, &processed[..80]), f64::INFINITY);
    }

    #[test]
    fn test_more_noise_lower_snr() {
        let original: Vec<f32> = (0..500)
            .map(|i| (std::f32::consts::TAU * 10.0 * i as f32 / 500.0).sin())
            .collect();

        let with_noise = |amp: f32| -> f64 {
            let processed: Vec<f32> = original
                .iter()
                .enumerate()
                .map(|(i, &x)| x + amp * if i % 2 == 0 { 1.0 } else { -1.0 })
                .collect();
            snr_db(&original, &processed)
        };

        assert!(with_noise(0.01) > with_noise(0.1));
    }
}
