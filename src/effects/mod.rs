//! Audio effect implementations
//!
//! Effects transform a decoded buffer in place of the original's signal
//! chain: stylization (tape, vinyl, radio), quantization and companding,
//! channel coding, modulation, and utility stages. Every effect preserves
//! the sample rate and channel layout of its input; effects that inject
//! noise draw from a seeded RNG in their configuration so a fixed setup
//! reproduces bit-identical output.

pub mod aliasing;
pub mod am;
pub mod companding;
pub mod doppler;
pub mod dsp;
pub mod fsk;
pub mod hamming;
pub mod normalize;
pub mod pcm;
pub mod radio;
pub mod reverb;
pub mod tape;
pub mod vinyl;

pub use aliasing::Aliasing;
pub use am::{AmMode, AmRadio};
pub use companding::Companding;
pub use doppler::Doppler;
pub use fsk::FskCodec;
pub use hamming::HammingCode;
pub use normalize::Normalize;
pub use pcm::PcmQuantize;
pub use radio::Radio;
pub use reverb::{ConvolutionReverb, IrKind};
pub use tape::Tape;
pub use vinyl::Vinyl;

use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Trait for audio effects
pub trait Effect {
    /// Human-readable effect name, used in stage logging
    fn name(&self) -> &'static str;

    /// Process an audio buffer through this effect
    fn process(&mut self, buffer: &AudioBuffer) -> AudioResult<AudioBuffer>;
}

/// Effect names accepted by [`chain_from_names`]
pub const KNOWN_EFFECTS: &[&str] = &[
    "tape",
    "vinyl",
    "radio",
    "normalize",
    "pcm",
    "companding",
    "aliasing",
    "hamming",
    "am",
    "fsk",
    "doppler",
    "reverb",
];

/// Build a boxed effect chain from effect names, using default parameters.
///
/// Unknown names fail with a configuration error listing the known set.
pub fn chain_from_names<I, S>(names: I) -> AudioResult<Vec<Box<dyn Effect>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chain: Vec<Box<dyn Effect>> = Vec::new();

    for name in names {
        let effect: Box<dyn Effect> = match name.as_ref() {
            "tape" => Box::new(Tape::default()),
            "vinyl" => Box::new(Vinyl::default()),
            "radio" => Box::new(Radio::default()),
            "normalize" => Box::new(Normalize::default()),
            "pcm" => Box::new(PcmQuantize::default()),
            "companding" => Box::new(Companding::default()),
            "aliasing" => Box::new(Aliasing::default()),
            "hamming" => Box::new(HammingCode::default()),
            "am" => Box::new(AmRadio::default()),
            "fsk" => Box::new(FskCodec::default()),
            "doppler" => Box::new(Doppler::default()),
            "reverb" => Box::new(ConvolutionReverb::default()),
            other => {
                return Err(AudioError::Config(format!(
                    "unknown effect '{}', known effects: {}",
                    other,
                    KNOWN_EFFECTS.join(", ")
                )));
            }
        };
        chain.push(effect);
    }

    Ok(chain)
}

/// Run a buffer through every effect in the chain, in order
pub fn apply_chain(
    chain: &mut [Box<dyn Effect>],
    buffer: AudioBuffer,
) -> AudioResult<AudioBuffer> {
    let mut audio = buffer;

    for (i, effect) in chain.iter_mut().enumerate() {
        log::info!("[{}] applying {}", i + 1, effect.name());
        audio = effect.process(&audio)?;
    }

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;

    #[test]
    fn test_chain_from_names_valid() {
        let chain = chain_from_names(["vinyl", "normalize"]).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].name(), "vinyl crackle");
        assert_eq!(chain[1].name(), "normalizer");
    }

    #[test]
    fn test_chain_from_names_unknown() {
        let result = chain_from_names(["vinyl", "chorus-of-doom"]);
        match result {
            Err(AudioError::Config(msg)) => {
                assert!(msg.contains("chorus-of-doom"));
                assert!(msg.contains("vinyl"));
            }
            other => panic!("expected config error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_chain_covers_known_effects() {
        let chain = chain_from_names(KNOWN_EFFECTS.iter().copied()).unwrap();
        assert_eq!(chain.len(), KNOWN_EFFECTS.len());
    }

    #[test]
    fn test_apply_empty_chain_is_identity() {
        let buffer = AudioBuffer::new(vec![0.1, 0.2, 0.3, 0.4], 44100, Channels::Stereo).unwrap();
        let mut chain: Vec<Box<dyn Effect>> = Vec::new();
        let out = apply_chain(&mut chain, buffer.clone()).unwrap();
        assert_eq!(out, buffer);
    }
}
