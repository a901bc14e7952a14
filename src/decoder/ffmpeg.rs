//! ffmpeg subprocess decoder
//!
//! Invokes the external ffmpeg binary and reads raw `f32le` samples from its
//! stdout at the configured rate and layout. The subprocess is the only
//! blocking operation in a pipeline run; a wall-clock timeout bounds it.

use crate::config::DecodeConfig;
use crate::core::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Poll interval while waiting for the subprocess to exit
const WAIT_POLL: Duration = Duration::from_millis(10);

/// Decoder backed by the external ffmpeg tool
pub struct FfmpegDecoder {
    config: DecodeConfig,
}

impl FfmpegDecoder {
    /// Create a decoder with the given target format configuration
    pub fn new(config: DecodeConfig) -> Self {
        FfmpegDecoder { config }
    }

    fn spawn(&self, source: &Path) -> AudioResult<Child> {
        let rate = self.config.sample_rate.to_string();
        let channels = self.config.channels.count().to_string();

        Command::new(&self.config.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .arg("-i")
            .arg(source)
            .arg("-vn")
            .args(["-ac", &channels])
            .args(["-ar", &rate])
            .args(["-f", "f32le", "-acodec", "pcm_f32le"])
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    AudioError::MissingTool {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    AudioError::Io(e)
                }
            })
    }

    /// Wait for the child, killing it when the timeout expires.
    fn wait_with_timeout(&self, child: &mut Child) -> AudioResult<std::process::ExitStatus> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AudioError::DecodeTimeout {
                    seconds: self.config.timeout.as_secs(),
                });
            }

            thread::sleep(WAIT_POLL);
        }
    }
}

/// Drain a pipe on a background thread so the child never blocks on a full
/// pipe while we wait for it.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(handle: JoinHandle<io::Result<Vec<u8>>>) -> AudioResult<Vec<u8>> {
    handle
        .join()
        .map_err(|_| AudioError::Decode("pipe reader thread panicked".to_string()))?
        .map_err(AudioError::Io)
}

impl super::Decoder for FfmpegDecoder {
    fn decode(&self, source: &Path) -> AudioResult<AudioBuffer> {
        if !source.exists() {
            return Err(AudioError::Decode(format!(
                "input not found: {}",
                source.display()
            )));
        }

        log::debug!(
            "spawning {} for {} (target {} Hz, {})",
            self.config.ffmpeg_path.display(),
            source.display(),
            self.config.sample_rate,
            self.config.channels.name()
        );

        let mut child = self.spawn(source)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AudioError::Decode("failed to capture decoder stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AudioError::Decode("failed to capture decoder stderr".to_string()))?;

        let stdout_reader = drain(stdout);
        let stderr_reader = drain(stderr);

        let status = self.wait_with_timeout(&mut child)?;

        let raw = join_reader(stdout_reader)?;
        let stderr_bytes = join_reader(stderr_reader)?;
        let stderr_text = String::from_utf8_lossy(&stderr_bytes).trim().to_string();

        if !status.success() {
            return Err(AudioError::ToolFailed {
                code: status.code(),
                stderr: stderr_text,
            });
        }

        if raw.is_empty() {
            return Err(AudioError::Decode(format!(
                "ffmpeg produced no samples for {}",
                source.display()
            )));
        }

        if raw.len() % 4 != 0 {
            return Err(AudioError::Buffer(format!(
                "truncated sample stream: {} bytes is not a whole number of f32 samples",
                raw.len()
            )));
        }

        let samples: Vec<f32> = raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let buffer = AudioBuffer::new(samples, self.config.sample_rate, self.config.channels)?;

        log::debug!(
            "decoded {} frames ({:.2} s) from {}",
            buffer.frames(),
            buffer.duration().as_secs_f64(),
            source.display()
        );

        Ok(buffer)
    }
}
