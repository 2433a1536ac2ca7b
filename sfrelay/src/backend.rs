//! Accès aux plateformes derrière des traits
//!
//! Le relais ne parle qu'à ces traits ; les clients réels les implémentent
//! et les tests leur substituent des doublures.

use async_trait::async_trait;
use sfsoundcloud::{Playlist, SoundCloudClient, Track};
use sfyoutube::{VideoInfo, YoutubeClient};

#[async_trait]
pub trait SoundCloudBackend: Send + Sync {
    /// Poignée de main : obtention d'un `client_id`
    async fn fetch_client_id(&self) -> sfsoundcloud::Result<String>;

    async fn track(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Track>;

    async fn playlist(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Playlist>;

    async fn stream(
        &self,
        track: &Track,
        client_id: &str,
    ) -> sfsoundcloud::Result<sfsoundcloud::AudioStream>;
}

#[async_trait]
pub trait YoutubeBackend: Send + Sync {
    async fn video_info(&self, url: &str) -> sfyoutube::Result<VideoInfo>;

    async fn audio_stream(&self, url: &str) -> sfyoutube::Result<sfyoutube::AudioStream>;
}

#[async_trait]
impl SoundCloudBackend for SoundCloudClient {
    async fn fetch_client_id(&self) -> sfsoundcloud::Result<String> {
        SoundCloudClient::fetch_client_id(self).await
    }

    async fn track(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Track> {
        SoundCloudClient::track(self, url, client_id).await
    }

    async fn playlist(&self, url: &str, client_id: &str) -> sfsoundcloud::Result<Playlist> {
        SoundCloudClient::playlist(self, url, client_id).await
    }

    async fn stream(
        &self,
        track: &Track,
        client_id: &str,
    ) -> sfsoundcloud::Result<sfsoundcloud::AudioStream> {
        SoundCloudClient::stream(self, track, client_id).await
    }
}

#[async_trait]
impl YoutubeBackend for YoutubeClient {
    async fn video_info(&self, url: &str) -> sfyoutube::Result<VideoInfo> {
        YoutubeClient::video_info(self, url).await
    }

    async fn audio_stream(&self, url: &str) -> sfyoutube::Result<sfyoutube::AudioStream> {
        YoutubeClient::audio_stream(self, url).await
    }
}
