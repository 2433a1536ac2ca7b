//! Réponses JSON du relais

use serde::{Serialize, Serializer};

/// Métadonnées d'une piste : `{title, duration, thumbnail}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub title: String,
    /// Durée en secondes
    #[serde(rename = "duration", serialize_with = "seconds")]
    pub duration_seconds: f64,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
}

/// Contenu d'un set : `{playlistTitle, tracks}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistInfo {
    #[serde(rename = "playlistTitle")]
    pub title: String,
    pub tracks: Vec<TrackRef>,
}

/// Entrée d'un set, durée exposée en secondes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRef {
    pub title: String,
    pub url: String,
    #[serde(rename = "duration", serialize_with = "millis_as_seconds")]
    pub duration_ms: u64,
    pub artist: String,
}

impl TrackRef {
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Un nombre entier de secondes s'écrit comme un entier JSON (`180`, pas `180.0`)
fn seconds<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let v = *value;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        serializer.serialize_u64(v as u64)
    } else {
        serializer.serialize_f64(v)
    }
}

fn millis_as_seconds<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    if value % 1000 == 0 {
        serializer.serialize_u64(value / 1000)
    } else {
        serializer.serialize_f64(*value as f64 / 1000.0)
    }
}
