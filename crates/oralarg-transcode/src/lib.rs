//! Audio extraction through `yt-dlp`.
//!
//! The downloader does the heavy lifting: it follows the HLS manifest,
//! fetches the segments and hands them to ffmpeg for MP3 encoding. This
//! crate only builds the command line and maps its exit status.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "yt-dlp";

pub const AUDIO_FORMAT: &str = "mp3";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{0} not found on PATH (install yt-dlp and ffmpeg)")]
    ToolNotFound(String),

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with code {exit_code}")]
    CommandFailed { tool: String, exit_code: i32 },
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Path the downloader will write for `stem` once audio extraction finishes.
pub fn expected_output(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.{AUDIO_FORMAT}"))
}

/// yt-dlp `-o` template for `<dir>/<stem>.<ext>`.
fn output_template(dir: &Path, stem: &str) -> PathBuf {
    let dir = dir.to_string_lossy().replace('%', "%%");
    let stem = stem.replace('%', "%%");
    Path::new(&dir).join(format!("{stem}.%(ext)s"))
}

/// A `yt-dlp` invocation configured for audio-only MP3 output.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for extracting `stream_url` to `<dir>/<stem>.mp3`.
    ///
    /// The output template keeps `%(ext)s` so yt-dlp names the intermediate
    /// download itself and only the final file gets the `.mp3` extension.
    /// Literal `%` in the directory or stem is doubled so yt-dlp does not
    /// read it as template syntax.
    pub fn build_args(&self, stream_url: &str, dir: &Path, stem: &str) -> Vec<OsString> {
        let template = output_template(dir, stem);
        vec![
            "--no-playlist".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            AUDIO_FORMAT.into(),
            "-o".into(),
            template.into_os_string(),
            stream_url.into(),
        ]
    }

    /// Run the downloader and wait for it. Its progress output goes straight
    /// to the terminal.
    pub async fn extract_audio(&self, stream_url: &str, dir: &Path, stem: &str) -> TranscodeResult<PathBuf> {
        let args = self.build_args(stream_url, dir, stem);
        tracing::debug!(
            "Running: {} {}",
            self.program,
            args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
        );

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(TranscodeError::CommandFailed {
                tool: self.program.clone(),
                // Killed by a signal
                exit_code: status.code().unwrap_or(-1),
            });
        }

        Ok(expected_output(dir, stem))
    }

    /// Ask the downloader for its version; doubles as an "is it installed" check.
    pub async fn version(&self) -> TranscodeResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(TranscodeError::CommandFailed {
                tool: self.program.clone(),
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn spawn_error(&self, e: io::Error) -> TranscodeError {
        match e.kind() {
            io::ErrorKind::NotFound => TranscodeError::ToolNotFound(self.program.clone()),
            _ => TranscodeError::Spawn {
                tool: self.program.clone(),
                source: e,
            },
        }
    }
}
