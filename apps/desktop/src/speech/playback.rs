//! Audio playback through an external player process.

use super::SpeechError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Runs a configured command line with the audio file appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPlayer {
    program: String,
    args: Vec<String>,
}

impl AudioPlayer {
    pub fn from_command_line(command: &str) -> Result<Self, SpeechError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| SpeechError::InvalidCommand(command.to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Start playing `path` in the background. The process dies with the handle.
    pub fn spawn(&self, path: &Path) -> Result<Child, SpeechError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        Ok(child)
    }

    /// Play `path` to the end.
    pub async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        let status = self.spawn(path)?.wait().await?;
        if !status.success() {
            return Err(SpeechError::Player {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Length of a PCM WAV file, read from its header.
pub fn wav_duration(path: &Path) -> Option<Duration> {
    let mut header = Vec::new();
    File::open(path).ok()?.take(64 * 1024).read_to_end(&mut header).ok()?;

    if header.get(0..4)? != b"RIFF" || header.get(8..12)? != b"WAVE" {
        return None;
    }

    let mut byte_rate = None;
    let mut pos = 12;
    while pos + 8 <= header.len() {
        let id = &header[pos..pos + 4];
        let size = u32::from_le_bytes(header[pos + 4..pos + 8].try_into().ok()?) as usize;
        let body = pos + 8;

        match id {
            b"fmt " => {
                let rate = header.get(body + 8..body + 12)?;
                byte_rate = Some(u32::from_le_bytes(rate.try_into().ok()?));
            }
            b"data" => {
                let rate = byte_rate.filter(|r| *r > 0)?;
                return Some(Duration::from_secs_f64(size as f64 / rate as f64));
            }
            _ => {}
        }

        pos = body + size + (size % 2);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16-bit mono header followed by `data_len` zero bytes.
    fn write_wav(path: &Path, sample_rate: u32, data_len: u32) {
        let byte_rate = sample_rate * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn parses_command_line() {
        let player = AudioPlayer::from_command_line("ffplay -nodisp -autoexit").unwrap();
        assert_eq!(player.program(), "ffplay");
        assert_eq!(player.args, vec!["-nodisp".to_string(), "-autoexit".into()]);
        assert!(matches!(
            AudioPlayer::from_command_line("   "),
            Err(SpeechError::InvalidCommand(_))
        ));
    }

    #[test]
    fn wav_duration_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.wav");
        write_wav(&path, 8000, 32000);
        assert_eq!(wav_duration(&path), Some(Duration::from_secs(2)));
    }

    #[test]
    fn wav_duration_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        std::fs::write(&path, "+hello").unwrap();
        assert_eq!(wav_duration(&path), None);
        assert_eq!(wav_duration(&dir.path().join("missing.wav")), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn play_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        std::fs::write(&path, b"").unwrap();

        let ok = AudioPlayer::from_command_line("true").unwrap();
        assert!(ok.play(&path).await.is_ok());

        let failing = AudioPlayer::from_command_line("false").unwrap();
        assert!(matches!(
            failing.play(&path).await,
            Err(SpeechError::Player { .. })
        ));
    }
}
