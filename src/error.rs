use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors produced by the decode, effect, analysis, and export stages
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error (file operations, pipe reads)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The external decoding/encoding tool could not be found
    #[error("external tool not found: {path}")]
    MissingTool {
        /// Configured path of the missing binary
        path: PathBuf,
    },

    /// The external tool ran but exited with a failure status
    #[error("external tool failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured stderr output
        stderr: String,
    },

    /// The external tool did not finish within the configured timeout
    #[error("decode timed out after {seconds} s")]
    DecodeTimeout {
        /// Timeout that expired, in seconds
        seconds: u64,
    },

    /// Decoding failed
    #[error("decode error: {0}")]
    Decode(String),

    /// Unsupported audio format
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid channel configuration
    #[error("invalid channel configuration: expected {expected}, got {got}")]
    InvalidChannels {
        /// Expected number of channels
        expected: u32,
        /// Actual number of channels
        got: u32,
    },

    /// Invalid sample rate
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Sample buffer shape violation
    #[error("buffer error: {0}")]
    Buffer(String),

    /// Analysis failed on malformed or empty input
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Encoding failed
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
