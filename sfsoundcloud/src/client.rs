//! Client HTTP pour l'API SoundCloud v2
//!
//! Le client est sans état vis-à-vis des identifiants : chaque appel reçoit
//! le `client_id` à utiliser, le cache étant géré par l'appelant.

use crate::client_id;
use crate::error::{Result, SoundCloudError};
use crate::hls;
use crate::models::{Playlist, Resource, StreamUrlResponse, Track};
use crate::AudioStream;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// URL de base de l'API v2
pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

/// Application web, d'où est extrait le `client_id`
pub const DEFAULT_SITE_BASE: &str = "https://soundcloud.com";

/// Timeout par défaut des appels JSON
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Nombre maximum d'ids acceptés par `/tracks?ids=`
pub const TRACKS_BATCH_SIZE: usize = 50;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) soundfree/0.1.0";

/// Client SoundCloud
///
/// # Exemple
///
/// ```no_run
/// use sfsoundcloud::SoundCloudClient;
///
/// # async fn example() -> sfsoundcloud::Result<()> {
/// let client = SoundCloudClient::new()?;
/// let client_id = client.fetch_client_id().await?;
/// let track = client.track("https://soundcloud.com/artist/song", &client_id).await?;
/// println!("{} ({} ms)", track.title, track.duration);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SoundCloudClient {
    client: Client,
    api_base: String,
    site_base: String,
    request_timeout: Duration,
}

impl SoundCloudClient {
    /// Client avec les réglages par défaut
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Extrait un `client_id` des scripts de l'application web
    pub async fn fetch_client_id(&self) -> Result<String> {
        client_id::scrape(&self.client, &self.site_base, self.request_timeout).await
    }

    /// Résout une URL publique (`/resolve?url=`)
    pub async fn resolve(&self, url: &str, client_id: &str) -> Result<Resource> {
        let mut endpoint = Url::parse(&format!("{}/resolve", self.api_base))?;
        endpoint
            .query_pairs_mut()
            .append_pair("url", url)
            .append_pair("client_id", client_id);

        debug!("Resolving {}", url);
        self.get_json(endpoint).await
    }

    /// Résout une URL de piste
    pub async fn track(&self, url: &str, client_id: &str) -> Result<Track> {
        match self.resolve(url, client_id).await? {
            Resource::Track(track) => Ok(track),
            other => Err(SoundCloudError::UnexpectedKind {
                expected: "track",
                got: other.kind().to_string(),
            }),
        }
    }

    /// Résout une URL de set et complète les pistes "stub"
    ///
    /// L'ordre natif est conservé ; les stubs que l'API ne sait pas compléter
    /// sont écartés.
    pub async fn playlist(&self, url: &str, client_id: &str) -> Result<Playlist> {
        let mut playlist = match self.resolve(url, client_id).await? {
            Resource::Playlist(playlist) => playlist,
            other => {
                return Err(SoundCloudError::UnexpectedKind {
                    expected: "playlist",
                    got: other.kind().to_string(),
                })
            }
        };

        let tracks = playlist.tracks.take().ok_or(SoundCloudError::MissingTracks)?;
        let stub_ids: Vec<u64> = tracks
            .iter()
            .filter(|t| !t.is_complete())
            .map(|t| t.id)
            .collect();

        if stub_ids.is_empty() {
            playlist.tracks = Some(tracks);
            return Ok(playlist);
        }

        debug!(
            "Playlist '{}' has {} stub tracks out of {}",
            playlist.title,
            stub_ids.len(),
            tracks.len()
        );

        let mut completed: HashMap<u64, Track> = self
            .tracks_by_ids(&stub_ids, client_id)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let tracks = tracks
            .into_iter()
            .filter_map(|t| {
                if t.is_complete() {
                    return Some(t);
                }
                let full = completed.remove(&t.id);
                if full.is_none() {
                    warn!("Dropping track {} of '{}': not returned by the API", t.id, playlist.title);
                }
                full
            })
            .collect();

        playlist.tracks = Some(tracks);
        Ok(playlist)
    }

    /// Récupère des pistes complètes par lots de [`TRACKS_BATCH_SIZE`]
    pub async fn tracks_by_ids(&self, ids: &[u64], client_id: &str) -> Result<Vec<Track>> {
        let mut tracks = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(TRACKS_BATCH_SIZE) {
            let ids = chunk
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");

            let mut endpoint = Url::parse(&format!("{}/tracks", self.api_base))?;
            endpoint
                .query_pairs_mut()
                .append_pair("ids", &ids)
                .append_pair("client_id", client_id);

            let batch: Vec<Track> = self.get_json(endpoint).await?;
            tracks.extend(batch);
        }

        Ok(tracks)
    }

    /// Ouvre le flux audio d'une piste
    ///
    /// La transcodification progressive (MP3 de préférence) est privilégiée ;
    /// à défaut, la transcodification HLS MP3 en clair est lue segment par
    /// segment. Le corps n'est soumis à aucun timeout.
    pub async fn stream(&self, track: &Track, client_id: &str) -> Result<AudioStream> {
        if let Some(transcoding) = track.progressive_transcoding() {
            let stream_url = self.stream_url(&transcoding.url, track, client_id).await?;
            debug!("Streaming '{}' progressively", track.title);

            let response = self.client.get(&stream_url).send().await?;
            let response = check_status(response).await?;
            let stream = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(SoundCloudError::from));
            return Ok(Box::pin(stream));
        }

        if let Some(transcoding) = track.hls_transcoding() {
            let playlist_url = self.stream_url(&transcoding.url, track, client_id).await?;
            let segments = hls::fetch_segments(&self.client, &playlist_url, self.request_timeout).await?;
            info!(
                "No progressive stream for '{}', relaying {} HLS segments",
                track.title,
                segments.len()
            );
            return Ok(hls::segment_stream(self.client.clone(), segments));
        }

        Err(SoundCloudError::NoStream(format!(
            "track {} offers neither a progressive nor a plain HLS transcoding",
            track.id
        )))
    }

    /// Échange une URL de transcodification contre l'URL signée du flux
    async fn stream_url(&self, transcoding_url: &str, track: &Track, client_id: &str) -> Result<String> {
        let mut endpoint = Url::parse(transcoding_url)?;
        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("client_id", client_id);
            if let Some(auth) = &track.track_authorization {
                query.append_pair("track_authorization", auth);
            }
        }

        let response: StreamUrlResponse = self.get_json(endpoint).await?;
        Ok(response.url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!("{} returned {}", url, status)
    } else {
        format!("{} returned {}: {}", url, status, truncate(&body, 200))
    };
    Err(SoundCloudError::from_status_code(status.as_u16(), message))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Builder pour configurer un [`SoundCloudClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    api_base: String,
    site_base: String,
    request_timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client HTTP fourni par l'appelant
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn site_base(mut self, url: impl Into<String>) -> Self {
        self.site_base = url.into();
        self
    }

    /// Timeout des appels JSON (les flux audio n'en ont pas)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<SoundCloudClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .connect_timeout(self.request_timeout)
                .build()?,
        };

        Ok(SoundCloudClient {
            client,
            api_base: self.api_base,
            site_base: self.site_base,
            request_timeout: self.request_timeout,
        })
    }
}
