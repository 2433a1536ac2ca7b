//! Doublures des plateformes pour les tests du relais
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde_json::json;
use sfrelay::{CredentialPolicy, CredentialStore, Relay, SoundCloudBackend, YoutubeBackend};
use sfsoundcloud::{Playlist, SoundCloudError, Track};
use sfyoutube::{VideoInfo, YoutubeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const CLIENT_ID: &str = "abcdefghijklmnopqrstuvwxyz012345";

/// Morceau produit par un flux simulé
#[derive(Clone, Debug)]
pub enum Chunk {
    Data(&'static [u8]),
    Fail(&'static str),
}

fn chunks_to_results<E>(chunks: &[Chunk], err: fn(String) -> E) -> Vec<Result<Bytes, E>> {
    chunks
        .iter()
        .map(|c| match c {
            Chunk::Data(d) => Ok(Bytes::from_static(d)),
            Chunk::Fail(msg) => Err(err(msg.to_string())),
        })
        .collect()
}

#[derive(Default)]
pub struct StubSoundCloud {
    pub handshake_result: Option<String>,
    pub handshake_delay: Duration,
    pub tracks: HashMap<String, Track>,
    pub playlists: HashMap<String, Playlist>,
    pub audio: Vec<Chunk>,
    pub open_failure: Option<&'static str>,
    pub endless: Option<Arc<EndlessUpstream>>,
    pub handshakes: AtomicUsize,
    pub calls: AtomicUsize,
    pub seen_client_ids: std::sync::Mutex<Vec<String>>,
}

impl StubSoundCloud {
    pub fn new() -> Self {
        Self {
            handshake_result: Some(CLIENT_ID.to_string()),
            ..Default::default()
        }
    }

    pub fn failing_handshake() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, url: &str, track: Track) -> Self {
        self.tracks.insert(url.to_string(), track);
        self
    }

    pub fn with_playlist(mut self, url: &str, playlist: Playlist) -> Self {
        self.playlists.insert(url.to_string(), playlist);
        self
    }

    pub fn with_audio(mut self, audio: Vec<Chunk>) -> Self {
        self.audio = audio;
        self
    }

    pub fn handshakes(&self) -> usize {
        self.handshakes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, client_id: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_client_ids
            .lock()
            .unwrap()
            .push(client_id.to_string());
    }
}

#[async_trait]
impl SoundCloudBackend for StubSoundCloud {
    async fn fetch_client_id(&self) -> sfsoundcloud::Result<String> {
        self.handshakes.fetch_add(1, Ordering::SeqCst);
        if !self.handshake_delay.is_zero() {
            tokio::time::sleep(self.handshake_delay).await;
        }
        self.handshake_result
            .clone()
            .ok_or_else(|| SoundCloudError::ClientIdNotFound("no script bundle".into()))
    }

    async fn track(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Track> {
        self.record(client_id);
        self.tracks
            .get(url)
            .cloned()
            .ok_or_else(|| SoundCloudError::NotFound(format!("/resolve returned 404 for {}", url)))
    }

    async fn playlist(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Playlist> {
        self.record(client_id);
        self.playlists
            .get(url)
            .cloned()
            .ok_or_else(|| SoundCloudError::NotFound(format!("/resolve returned 404 for {}", url)))
    }

    async fn stream(
        &self,
        _track: &Track,
        client_id: &str,
    ) -> sfsoundcloud::Result<sfsoundcloud::AudioStream> {
        self.record(client_id);
        if let Some(msg) = self.open_failure {
            return Err(SoundCloudError::NoStream(msg.to_string()));
        }
        if let Some(endless) = &self.endless {
            return Ok(endless.clone().stream());
        }
        let items = chunks_to_results(&self.audio, SoundCloudError::Hls);
        Ok(stream::iter(items).boxed())
    }
}

/// Flux amont infini qui note ses lectures et sa libération
#[derive(Default)]
pub struct EndlessUpstream {
    pub pulls: AtomicUsize,
    pub dropped: AtomicBool,
}

struct DropFlag(Arc<EndlessUpstream>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.dropped.store(true, Ordering::SeqCst);
    }
}

impl EndlessUpstream {
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }

    fn stream(self: Arc<Self>) -> sfsoundcloud::AudioStream {
        stream::unfold(DropFlag(self), |flag| async move {
            flag.0.pulls.fetch_add(1, Ordering::SeqCst);
            Some((Ok(Bytes::from_static(b"frame")), flag))
        })
        .boxed()
    }
}

#[derive(Default)]
pub struct StubYoutube {
    pub videos: HashMap<String, VideoInfo>,
    pub audio: Vec<Chunk>,
    pub calls: AtomicUsize,
}

impl StubYoutube {
    pub fn with_video(mut self, url: &str, video: VideoInfo) -> Self {
        self.videos.insert(url.to_string(), video);
        self
    }

    pub fn with_audio(mut self, audio: Vec<Chunk>) -> Self {
        self.audio = audio;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl YoutubeBackend for StubYoutube {
    async fn video_info(&self, url: &str) -> sfyoutube::Result<VideoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.videos.get(url).cloned().ok_or_else(|| YoutubeError::Failed {
            code: Some(1),
            stderr: "ERROR: Video unavailable".into(),
        })
    }

    async fn audio_stream(&self, _url: &str) -> sfyoutube::Result<sfyoutube::AudioStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let items = chunks_to_results(&self.audio, |stderr| YoutubeError::Failed {
            code: Some(1),
            stderr,
        });
        Ok(stream::iter(items).boxed())
    }
}

pub fn track(id: u64, title: &str, duration_ms: u64) -> Track {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "duration": duration_ms,
        "permalink_url": format!("https://soundcloud.com/artist/{}", id),
        "artwork_url": format!("https://i1.sndcdn.com/artworks-{}-large.jpg", id),
        "user": { "id": 9, "username": "artist" }
    }))
    .unwrap()
}

pub fn anonymous_track(id: u64, title: &str, duration_ms: u64) -> Track {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "duration": duration_ms,
        "permalink_url": format!("https://soundcloud.com/someone/{}", id),
        "artwork_url": null
    }))
    .unwrap()
}

pub fn playlist(title: &str, tracks: Option<Vec<Track>>) -> Playlist {
    Playlist {
        id: 100,
        title: title.to_string(),
        user: None,
        permalink_url: None,
        track_count: tracks.as_ref().map(|t| t.len() as u32).unwrap_or(0),
        tracks,
    }
}

pub fn video(title: &str, duration: Option<f64>) -> VideoInfo {
    serde_json::from_value(json!({
        "id": "abc",
        "title": title,
        "duration": duration,
        "thumbnails": [{ "url": "https://i.ytimg.com/vi/abc/default.jpg" }]
    }))
    .unwrap()
}

pub struct Harness {
    pub soundcloud: Arc<StubSoundCloud>,
    pub youtube: Arc<StubYoutube>,
    pub relay: Arc<Relay>,
}

pub fn harness(soundcloud: StubSoundCloud, youtube: StubYoutube) -> Harness {
    harness_with(soundcloud, youtube, None, CredentialPolicy::Lazy)
}

pub fn harness_with(
    soundcloud: StubSoundCloud,
    youtube: StubYoutube,
    configured_client_id: Option<&str>,
    policy: CredentialPolicy,
) -> Harness {
    let soundcloud = Arc::new(soundcloud);
    let youtube = Arc::new(youtube);
    let credentials = Arc::new(CredentialStore::with_client_id(
        soundcloud.clone(),
        configured_client_id.map(str::to_string),
    ));
    let relay = Arc::new(
        Relay::new(soundcloud.clone(), youtube.clone(), credentials).with_policy(policy),
    );
    Harness {
        soundcloud,
        youtube,
        relay,
    }
}
