//! Analysis Stage: segmentation, per-segment features, SNR, spectra
//!
//! The stage is deterministic: the same buffer and configuration always
//! produce identical feature records.

pub mod features;
pub mod segment;
pub mod snr;
pub mod spectrum;

pub use features::FeatureRecord;
pub use segment::Segmenter;
pub use snr::snr_db;
pub use spectrum::magnitude_spectrum;

use crate::config::AnalysisConfig;
use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Analyze a decoded buffer into per-segment feature records.
///
/// The buffer is mixed down to mono, partitioned into fixed windows, and one
/// [`FeatureRecord`] is extracted per window (the final window may be
/// shorter).
///
/// # Errors
///
/// Returns [`AudioError::Analysis`] for an empty buffer; malformed input
/// never yields a silent empty result.
pub fn analyze(buffer: &AudioBuffer, config: &AnalysisConfig) -> AudioResult<Vec<FeatureRecord>> {
    if buffer.is_empty() {
        return Err(AudioError::Analysis("empty sample buffer".to_string()));
    }

    let mono = buffer.mixdown();
    let segmenter = Segmenter::new(config.window, buffer.sample_rate())?;
    let samples_per_segment = segmenter.samples_per_segment();

    log::debug!(
        "analyzing {} frames at {} Hz, {} samples per window",
        buffer.frames(),
        buffer.sample_rate(),
        samples_per_segment
    );

    let records: Vec<FeatureRecord> = segmenter
        .split(&mono)
        .into_iter()
        .enumerate()
        .map(|(i, window)| {
            features::extract(
                window,
                buffer.sample_rate(),
                i as u32,
                i * samples_per_segment,
            )
        })
        .collect();

    log::debug!("extracted {} feature records", records.len());

    Ok(records)
}
