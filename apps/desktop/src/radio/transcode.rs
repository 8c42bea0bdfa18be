//! MP3 to WAV conversion.

use super::RadioError;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub trait AudioTranscoder: Send + Sync {
    fn mp3_to_wav(
        &self,
        mp3: &Path,
        wav: &Path,
    ) -> impl Future<Output = Result<(), RadioError>> + Send;
}

/// Shells out to an ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl AudioTranscoder for FfmpegTranscoder {
    async fn mp3_to_wav(&self, mp3: &Path, wav: &Path) -> Result<(), RadioError> {
        debug!(from = %mp3.display(), to = %wav.display(), "transcoding");
        let output = Command::new(&self.binary)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(mp3)
            .arg(wav)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RadioError::Transcode(format!("could not run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RadioError::Transcode(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_transcode_error() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = FfmpegTranscoder::new("definitely-not-ffmpeg-binary");
        let err = transcoder
            .mp3_to_wav(&dir.path().join("a.mp3"), &dir.path().join("a.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, RadioError::Transcode(ref msg) if msg.contains("could not run")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_binary_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = FfmpegTranscoder::new("false");
        let err = transcoder
            .mp3_to_wav(&dir.path().join("a.mp3"), &dir.path().join("a.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, RadioError::Transcode(ref msg) if msg.contains("exited")));
    }
}
