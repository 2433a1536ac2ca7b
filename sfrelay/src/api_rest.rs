//! API REST du relais
//!
//! Routes (montées sous `/api` par [`crate::RelayServerExt`]) :
//!
//! - `POST /track/info` : `{url}` → `{title, duration, thumbnail}`
//! - `POST /track/download` : `{url}` → audio/mpeg en pièce jointe
//! - `POST /playlist/info` : `{url}` → `{playlistTitle, tracks}`
//! - `POST /playlist/download` : `{url}` → audio/mpeg en pièce jointe

use crate::error::RelayError;
use crate::models::{PlaylistInfo, TrackInfo};
use crate::relay::Relay;
use crate::stream::{TrackDownload, AUDIO_CONTENT_TYPE};
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Crée le router de l'API du relais
pub fn create_router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/track/info", post(track_info))
        .route("/track/download", post(track_download))
        .route("/playlist/info", post(playlist_info))
        .route("/playlist/download", post(playlist_download))
        .with_state(relay)
}

// ============ Corps de requête ============

/// Corps `{ "url": ... }`
///
/// Un corps vide, `null`, sans `url` ou avec `url: ""` donne une URL absente,
/// que les opérations refusent. Un corps qui n'est pas du JSON est rejeté
/// directement.
#[derive(Debug, Default)]
pub struct UrlPayload {
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    url: Option<String>,
}

impl UrlPayload {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn parse(bytes: &[u8]) -> Result<Self, RelayError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let raw: Option<RawPayload> = serde_json::from_slice(bytes)
            .map_err(|e| RelayError::InvalidRequest(format!("Invalid JSON body: {}", e)))?;

        Ok(Self {
            url: raw.and_then(|r| r.url),
        })
    }
}

impl<S> FromRequest<S> for UrlPayload
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
        Self::parse(&bytes)
    }
}

// ============ Handlers ============

async fn track_info(
    State(relay): State<Arc<Relay>>,
    payload: UrlPayload,
) -> Result<Json<TrackInfo>, RelayError> {
    Ok(Json(relay.resolve_track_info(payload.url()).await?))
}

async fn track_download(
    State(relay): State<Arc<Relay>>,
    payload: UrlPayload,
) -> Result<TrackDownload, RelayError> {
    relay.open_track_stream(payload.url()).await
}

async fn playlist_info(
    State(relay): State<Arc<Relay>>,
    payload: UrlPayload,
) -> Result<Json<PlaylistInfo>, RelayError> {
    Ok(Json(relay.resolve_playlist(payload.url()).await?))
}

async fn playlist_download(
    State(relay): State<Arc<Relay>>,
    payload: UrlPayload,
) -> Result<TrackDownload, RelayError> {
    relay.open_playlist_track_stream(payload.url()).await
}

// ============ Réponses ============

impl IntoResponse for TrackDownload {
    fn into_response(self) -> Response {
        let disposition = HeaderValue::from_str(&self.content_disposition())
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"track.mp3\""));

        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            Body::from_stream(self.into_stream()),
        )
            .into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            warn!("Rejected request: {}", self);
            StatusCode::BAD_REQUEST
        } else {
            error!("{}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = match self.details() {
            Some(details) => serde_json::json!({
                "error": self.summary(),
                "details": details,
            }),
            None => serde_json::json!({ "error": self.summary() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_null_bodies_have_no_url() {
        assert_eq!(UrlPayload::parse(b"").unwrap().url(), None);
        assert_eq!(UrlPayload::parse(b"  \n").unwrap().url(), None);
        assert_eq!(UrlPayload::parse(b"null").unwrap().url(), None);
        assert_eq!(UrlPayload::parse(b"{}").unwrap().url(), None);
        assert_eq!(UrlPayload::parse(br#"{"url":null}"#).unwrap().url(), None);
    }

    #[test]
    fn url_is_extracted() {
        let payload = UrlPayload::parse(br#"{"url":"https://youtu.be/x","extra":1}"#).unwrap();
        assert_eq!(payload.url(), Some("https://youtu.be/x"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            UrlPayload::parse(b"{url:"),
            Err(RelayError::InvalidRequest(_))
        ));
        assert!(matches!(
            UrlPayload::parse(br#"{"url":42}"#),
            Err(RelayError::InvalidRequest(_))
        ));
    }
}
