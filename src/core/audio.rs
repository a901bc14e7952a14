use crate::error::{AudioError, AudioResult};
use std::time::Duration;

/// Channel layout for audio buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Mono (1 channel)
    Mono = 1,
    /// Stereo (2 channels)
    Stereo = 2,
}

impl Channels {
    /// Create Channels from a channel count
    pub fn from_count(count: u32) -> AudioResult<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            n => Err(AudioError::InvalidChannels {
                expected: 1,
                got: n,
            }),
        }
    }

    /// Parse a channel layout name ("mono" or "stereo")
    pub fn from_name(name: &str) -> AudioResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mono" | "1" => Ok(Channels::Mono),
            "stereo" | "2" => Ok(Channels::Stereo),
            other => Err(AudioError::Config(format!(
                "unknown channel layout '{}', expected 'mono' or 'stereo'",
                other
            ))),
        }
    }

    /// Get the number of channels
    pub fn count(&self) -> u32 {
        *self as u32
    }

    /// Get the channel layout name
    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "mono",
            Channels::Stereo => "stereo",
        }
    }
}

/// Decoded audio: interleaved f32 samples at a fixed rate and layout.
///
/// Samples are normalized to [-1.0, 1.0]. A buffer is produced once per run
/// by the decoder and owned by the pipeline that created it; nothing mutates
/// it concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved samples (frame-major for multi-channel audio)
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
    /// Channel layout
    channels: Channels,
}

impl AudioBuffer {
    /// Create a new audio buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: Channels) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        if samples.len() % channels.count() as usize != 0 {
            return Err(AudioError::Buffer(
                "sample count not divisible by channel count".to_string(),
            ));
        }

        Ok(AudioBuffer {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Create a silent buffer of `frames` samples per channel
    pub fn silent(frames: usize, sample_rate: u32, channels: Channels) -> AudioResult<Self> {
        Self::new(
            vec![0.0; frames * channels.count() as usize],
            sample_rate,
            channels,
        )
    }

    /// Get a reference to the interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get a mutable reference to the interleaved samples
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Get owned samples (consumes the buffer)
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get the sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the channel layout
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.count() as usize
    }

    /// Get the buffer duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Deinterleave into one vector per channel
    pub fn planes(&self) -> Vec<Vec<f32>> {
        let n = self.channels.count() as usize;
        let frames = self.frames();
        let mut planes: Vec<Vec<f32>> = (0..n).map(|_| Vec::with_capacity(frames)).collect();

        for frame in self.samples.chunks_exact(n) {
            for (plane, &sample) in planes.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }

        planes
    }

    /// Rebuild a buffer from per-channel planes of equal length
    pub fn from_planes(planes: Vec<Vec<f32>>, sample_rate: u32) -> AudioResult<Self> {
        let channels = Channels::from_count(planes.len() as u32)?;
        let frames = planes[0].len();

        if planes.iter().any(|p| p.len() != frames) {
            return Err(AudioError::Buffer(
                "channel planes have unequal lengths".to_string(),
            ));
        }

        let mut samples = Vec::with_capacity(frames * planes.len());
        for i in 0..frames {
            for plane in &planes {
                samples.push(plane[i]);
            }
        }

        Self::new(samples, sample_rate, channels)
    }

    /// Channel-averaged mono copy of the samples
    pub fn mixdown(&self) -> Vec<f32> {
        let n = self.channels.count() as usize;
        if n == 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect()
    }
}
