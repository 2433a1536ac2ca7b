//! Résolution des sets SoundCloud

use crate::error::{RelayError, Resource, Result};
use crate::models::{PlaylistInfo, TrackRef};
use crate::platform::{is_soundcloud_playlist, require_url};
use crate::relay::Relay;
use tracing::info;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

impl Relay {
    /// Pistes d'un set, dans l'ordre du set
    pub async fn resolve_playlist(&self, url: Option<&str>) -> Result<PlaylistInfo> {
        let url = require_url(url)?;
        if !is_soundcloud_playlist(url) {
            return Err(RelayError::InvalidRequest(
                "Invalid SoundCloud playlist URL".to_string(),
            ));
        }

        let client_id = self.credentials.for_policy(self.policy).await?;
        let playlist = self
            .soundcloud
            .playlist(url, &client_id)
            .await
            .map_err(|e| RelayError::resolution(Resource::Playlist)(e.to_string()))?;

        let tracks = playlist.tracks.ok_or_else(|| {
            RelayError::resolution(Resource::Playlist)(
                "response has no track collection".to_string(),
            )
        })?;

        let tracks: Vec<TrackRef> = tracks
            .into_iter()
            .map(|track| TrackRef {
                artist: track.artist().unwrap_or(UNKNOWN_ARTIST).to_string(),
                url: track.permalink_url.unwrap_or_default(),
                duration_ms: track.duration,
                title: track.title,
            })
            .collect();

        info!("Playlist '{}' resolved with {} tracks", playlist.title, tracks.len());
        Ok(PlaylistInfo {
            title: playlist.title,
            tracks,
        })
    }
}
