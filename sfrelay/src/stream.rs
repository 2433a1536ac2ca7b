//! Relais des flux audio
//!
//! Le premier morceau du flux amont est attendu avant de rendre la main :
//! un échec à ce stade devient une erreur JSON, alors qu'un échec ultérieur
//! ne peut plus que couper la connexion.

use crate::error::{RelayError, Result};
use crate::platform::{require_url, Platform};
use crate::relay::Relay;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt::Display;
use tracing::{debug, error, info};

/// Flux relayé vers le client
pub type RelayStream = BoxStream<'static, Result<Bytes>>;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Téléchargement prêt à être servi
pub struct TrackDownload {
    pub title: String,
    pub filename: String,
    stream: RelayStream,
}

impl TrackDownload {
    pub fn new(title: impl Into<String>, stream: RelayStream) -> Self {
        let title = title.into();
        Self {
            filename: sanitize_filename(&title),
            title,
            stream,
        }
    }

    /// Valeur de l'en-tête `Content-Disposition`
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn into_stream(self) -> RelayStream {
        self.stream
    }
}

impl std::fmt::Debug for TrackDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackDownload")
            .field("title", &self.title)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Ne garde que `[A-Za-z0-9_]` et les blancs (écrits comme des espaces), puis ajoute `.mp3`
pub fn sanitize_filename(title: &str) -> String {
    let mut name: String = title
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    if name.trim().is_empty() {
        name = "track".to_string();
    }
    name.push_str(".mp3");
    name
}

impl Relay {
    /// Ouvre le flux d'une piste SoundCloud ou YouTube
    pub async fn open_track_stream(&self, url: Option<&str>) -> Result<TrackDownload> {
        let url = require_url(url)?;
        match Platform::require(url)? {
            Platform::SoundCloud => {
                let client_id = self.credentials.ensure().await?;
                self.open_soundcloud(url, &client_id).await
            }
            Platform::YouTube => self.open_youtube(url).await,
        }
    }

    /// Ouvre le flux d'une piste issue d'un set (SoundCloud uniquement)
    ///
    /// Soumis à la même politique d'identifiant que la résolution des sets.
    pub async fn open_playlist_track_stream(&self, url: Option<&str>) -> Result<TrackDownload> {
        let url = require_url(url)?;
        if Platform::detect(url) != Some(Platform::SoundCloud) {
            return Err(RelayError::InvalidRequest(
                "Invalid SoundCloud track URL".to_string(),
            ));
        }

        let client_id = self.credentials.for_policy(self.policy).await?;
        self.open_soundcloud(url, &client_id).await
    }

    async fn open_soundcloud(&self, url: &str, client_id: &str) -> Result<TrackDownload> {
        let track = self
            .soundcloud
            .track(url, client_id)
            .await
            .map_err(streaming_error)?;

        info!("⬇️ Relaying SoundCloud track '{}'", track.title);
        let upstream = self
            .soundcloud
            .stream(&track, client_id)
            .await
            .map_err(streaming_error)?;

        let stream = prime(upstream, track.title.clone()).await?;
        Ok(TrackDownload::new(track.title, stream))
    }

    async fn open_youtube(&self, url: &str) -> Result<TrackDownload> {
        let video = self.youtube.video_info(url).await.map_err(streaming_error)?;

        info!("⬇️ Relaying YouTube video '{}'", video.title);
        let upstream = self.youtube.audio_stream(url).await.map_err(streaming_error)?;

        let stream = prime(upstream, video.title.clone()).await?;
        Ok(TrackDownload::new(video.title, stream))
    }
}

fn streaming_error(e: impl Display) -> RelayError {
    RelayError::UpstreamStreaming(e.to_string())
}

/// Attend le premier morceau puis renvoie un flux équivalent et surveillé
async fn prime<E>(
    mut upstream: BoxStream<'static, std::result::Result<Bytes, E>>,
    label: String,
) -> Result<RelayStream>
where
    E: Display + Send + 'static,
{
    let first = match upstream.next().await {
        Some(Ok(chunk)) => Some(chunk),
        Some(Err(e)) => {
            error!("Stream for '{}' failed before the first byte: {}", label, e);
            return Err(streaming_error(e));
        }
        None => None,
    };

    let rest = upstream.map(|chunk| chunk.map_err(streaming_error));
    let replayed = stream::iter(first.map(Ok)).chain(rest);

    Ok(monitor(replayed.boxed(), label))
}

/// Suit la progression du relais et journalise sa fin
///
/// Si le flux est droppé avant sa fin, le client s'est déconnecté : la
/// garde le signale, et le drop du flux amont libère la réponse HTTP ou tue
/// le processus `yt-dlp`.
fn monitor(upstream: RelayStream, label: String) -> RelayStream {
    let guard = RelayGuard {
        label,
        bytes: 0,
        finished: false,
    };

    stream::unfold((upstream, guard), |(mut upstream, mut guard)| async move {
        if guard.finished {
            return None;
        }

        match upstream.next().await {
            Some(Ok(chunk)) => {
                guard.bytes += chunk.len() as u64;
                Some((Ok(chunk), (upstream, guard)))
            }
            Some(Err(e)) => {
                error!(
                    "Stream for '{}' failed after {} bytes: {}",
                    guard.label, guard.bytes, e
                );
                guard.finished = true;
                Some((Err(e), (upstream, guard)))
            }
            None => {
                info!("✅ Finished relaying '{}' ({} bytes)", guard.label, guard.bytes);
                guard.finished = true;
                None
            }
        }
    })
    .boxed()
}

struct RelayGuard {
    label: String,
    bytes: u64,
    finished: bool,
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                "Client disconnected from '{}' after {} bytes",
                self.label, self.bytes
            );
        } else {
            debug!("Relay for '{}' released", self.label);
        }
    }
}
