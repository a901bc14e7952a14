//! Format conversion filters used to conform decoded audio

pub mod remix;
pub mod resample;

pub use remix::Remix;
pub use resample::Resample;

use crate::core::AudioBuffer;
use crate::error::AudioResult;

/// Trait for format conversion filters
pub trait Filter {
    /// Process an audio buffer through this filter
    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer>;
}
