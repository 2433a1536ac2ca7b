//! Résolution des métadonnées d'une piste

use crate::error::{RelayError, Resource, Result};
use crate::models::TrackInfo;
use crate::platform::{require_url, Platform};
use crate::relay::Relay;
use tracing::{debug, info};

impl Relay {
    /// Titre, durée (secondes) et vignette d'une piste SoundCloud ou YouTube
    pub async fn resolve_track_info(&self, url: Option<&str>) -> Result<TrackInfo> {
        let url = require_url(url)?;
        let platform = Platform::require(url)?;
        info!("Processing {:?} URL: {}", platform, url);

        match platform {
            Platform::SoundCloud => {
                let client_id = self.credentials.ensure().await?;
                let track = self
                    .soundcloud
                    .track(url, &client_id)
                    .await
                    .map_err(|e| RelayError::resolution(Resource::Track)(e.to_string()))?;
                debug!("SoundCloud info retrieved for '{}'", track.title);

                Ok(TrackInfo {
                    duration_seconds: track.duration as f64 / 1000.0,
                    thumbnail_url: track.artwork().unwrap_or_default().to_string(),
                    title: track.title,
                })
            }
            Platform::YouTube => {
                let video = self
                    .youtube
                    .video_info(url)
                    .await
                    .map_err(|e| RelayError::resolution(Resource::Track)(e.to_string()))?;
                debug!("YouTube info retrieved for '{}'", video.title);

                Ok(TrackInfo {
                    duration_seconds: video.duration.unwrap_or(0.0).max(0.0),
                    thumbnail_url: video.best_thumbnail().unwrap_or_default().to_string(),
                    title: video.title,
                })
            }
        }
    }
}
