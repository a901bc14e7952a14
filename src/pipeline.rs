//! The linear processing pipeline: decode, stylize, analyze, export.
//!
//! A run is strictly sequential and single-pass; each stage finishes before
//! the next starts, and the first component error aborts the run. The only
//! blocking operation is the decode/encode subprocess.

use crate::analysis::{self, FeatureRecord};
use crate::config::{AnalysisConfig, DecodeConfig, ExportConfig};
use crate::decoder;
use crate::effects::{self, Effect};
use crate::encoder;
use crate::error::AudioResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Pipeline configuration bundle
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Decoder Adapter configuration
    pub decode: DecodeConfig,
    /// Analysis Stage configuration
    pub analysis: AnalysisConfig,
    /// Export configuration
    pub export: ExportConfig,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The audio source that was processed
    pub source: PathBuf,
    /// Per-segment feature records of the (processed) audio
    pub features: Vec<FeatureRecord>,
    /// SNR of the processed audio against the decoded original, in dB;
    /// absent when no effect ran
    pub snr_db: Option<f64>,
    /// Path of the exported artifact, when one was written
    pub output: Option<PathBuf>,
}

impl Pipeline {
    /// Create a pipeline from stage configurations
    pub fn new(decode: DecodeConfig, analysis: AnalysisConfig, export: ExportConfig) -> Self {
        Pipeline {
            decode,
            analysis,
            export,
        }
    }

    /// Run the full pipeline on one audio source.
    ///
    /// Decodes `source`, applies the effect chain in order, analyzes the
    /// processed audio, and exports it when `output` is given (`.mp3` via
    /// ffmpeg, anything else as WAV).
    pub fn run(
        &self,
        source: &Path,
        chain: &mut [Box<dyn Effect>],
        output: Option<&Path>,
    ) -> AudioResult<RunReport> {
        log::info!("decoding {}", source.display());
        let original = decoder::decode_source(source, &self.decode)?;
        log::info!(
            "decoded {:.2} s at {} Hz ({})",
            original.duration().as_secs_f64(),
            original.sample_rate(),
            original.channels().name()
        );

        let processed = if chain.is_empty() {
            original.clone()
        } else {
            effects::apply_chain(chain, original.clone())?
        };

        let snr_db = if chain.is_empty() {
            None
        } else {
            let snr = analysis::snr_db(&original.mixdown(), &processed.mixdown());
            log::info!("snr after processing: {:.2} dB", snr);
            Some(snr)
        };

        let features = analysis::analyze(&processed, &self.analysis)?;
        log::info!("extracted {} feature records", features.len());

        if let Some(path) = output {
            encoder::export_buffer(&processed, path, &self.export)?;
            log::info!("exported {}", path.display());
        }

        Ok(RunReport {
            source: source.to_path_buf(),
            features,
            snr_db,
            output: output.map(Path::to_path_buf),
        })
    }
}
