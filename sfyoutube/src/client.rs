//! Pilotage de `yt-dlp`
//!
//! - métadonnées : `yt-dlp -J --no-playlist --no-warnings <url>`
//! - audio : `yt-dlp -f bestaudio --no-playlist -o - <url>`, lu sur stdout
//!
//! Le processus est tué dès que le flux qui le porte est droppé.

use crate::error::{Result, YoutubeError};
use crate::models::VideoInfo;
use crate::AudioStream;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

/// Timeout par défaut de l'extraction des métadonnées
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client YouTube adossé à `yt-dlp`
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    ytdlp_path: PathBuf,
    request_timeout: Duration,
}

impl Default for YoutubeClient {
    fn default() -> Self {
        Self::new(DEFAULT_YTDLP_PATH)
    }
}

impl YoutubeClient {
    pub fn new(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.ytdlp_path);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    /// Récupère titre, durée et vignettes d'une vidéo
    pub async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        debug!("Fetching YouTube metadata for {}", url);

        let mut cmd = self.command();
        cmd.args(["-J", "--no-playlist", "--no-warnings", "--", url]);

        let output = tokio::time::timeout(self.request_timeout, cmd.output())
            .await
            .map_err(|_| YoutubeError::Timeout(self.request_timeout))?
            .map_err(YoutubeError::Spawn)?;

        if !output.status.success() {
            return Err(YoutubeError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Lance l'extraction audio et renvoie sa sortie standard comme flux
    ///
    /// Une sortie en erreur de `yt-dlp` se traduit par un dernier élément
    /// `Err` après les octets déjà lus.
    pub async fn audio_stream(&self, url: &str) -> Result<AudioStream> {
        debug!("Starting yt-dlp audio extraction for {}", url);

        let mut cmd = self.command();
        cmd.args([
            "-f",
            "bestaudio",
            "--no-playlist",
            "--no-warnings",
            "--quiet",
            "-o",
            "-",
            "--",
            url,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(YoutubeError::Spawn)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| YoutubeError::Io(std::io::Error::other("yt-dlp stdout not captured")))?;

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        let stream = async_stream::stream! {
            let mut reader = ReaderStream::new(stdout);
            while let Some(chunk) = reader.next().await {
                match chunk {
                    Ok(bytes) => yield Ok(bytes),
                    Err(e) => {
                        yield Err(YoutubeError::Io(e));
                        return;
                    }
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    let stderr = match stderr_task {
                        Some(task) => task.await.unwrap_or_default(),
                        None => String::new(),
                    };
                    warn!("yt-dlp exited with {}", status);
                    yield Err(YoutubeError::Failed {
                        code: status.code(),
                        stderr: stderr.trim().to_string(),
                    });
                }
                Err(e) => yield Err(YoutubeError::Io(e)),
            }
        };

        Ok(Box::pin(stream))
    }
}
