//! Lecture des transcodifications HLS non chiffrées
//!
//! Les segments d'une media playlist sont téléchargés l'un après l'autre et
//! leurs octets sont mis bout à bout dans un seul flux.

use crate::error::{Result, SoundCloudError};
use crate::AudioStream;
use futures::StreamExt;
use m3u8_rs::Playlist;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Télécharge et analyse une media playlist, renvoie les URLs des segments
pub async fn fetch_segments(client: &Client, playlist_url: &str, timeout: Duration) -> Result<Vec<Url>> {
    let response = client.get(playlist_url).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SoundCloudError::from_status_code(
            status.as_u16(),
            format!("HLS playlist returned {}", status),
        ));
    }
    let bytes = response.bytes().await?;
    parse_segments(&bytes, playlist_url)
}

/// Extrait les segments d'une media playlist
///
/// Les URIs relatives sont résolues par rapport à l'URL de la playlist.
pub fn parse_segments(bytes: &[u8], playlist_url: &str) -> Result<Vec<Url>> {
    let base = Url::parse(playlist_url)?;

    let playlist = match m3u8_rs::parse_playlist(bytes) {
        Ok((_, Playlist::MediaPlaylist(playlist))) => playlist,
        Ok((_, Playlist::MasterPlaylist(_))) => {
            return Err(SoundCloudError::Hls("master playlists are not supported".into()))
        }
        Err(e) => return Err(SoundCloudError::Hls(format!("failed to parse playlist: {e:?}"))),
    };

    if playlist
        .segments
        .iter()
        .any(|s| s.key.as_ref().is_some_and(|k| k.uri.is_some()))
    {
        return Err(SoundCloudError::Hls("encrypted segments are not supported".into()));
    }

    let segments = playlist
        .segments
        .iter()
        .map(|seg| base.join(&seg.uri))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if segments.is_empty() {
        return Err(SoundCloudError::Hls("playlist has no segment".into()));
    }
    Ok(segments)
}

/// Concatène les segments dans un flux tiré à la demande
///
/// Un segment n'est demandé que lorsque le précédent est entièrement consommé.
pub fn segment_stream(client: Client, segments: Vec<Url>) -> AudioStream {
    let stream = async_stream::stream! {
        let total = segments.len();
        for (index, segment) in segments.into_iter().enumerate() {
            debug!("Fetching HLS segment {}/{}", index + 1, total);
            let response = match client
                .get(segment)
                .send()
                .await
                .and_then(|r| r.error_for_status())
            {
                Ok(response) => response,
                Err(e) => {
                    yield Err(SoundCloudError::from(e));
                    return;
                }
            };

            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => yield Ok(bytes),
                    Err(e) => {
                        yield Err(SoundCloudError::from(e));
                        return;
                    }
                }
            }
        }
    };
    Box::pin(stream)
}
