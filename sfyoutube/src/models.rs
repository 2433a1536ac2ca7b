//! Sous-ensemble de la sortie `yt-dlp -J`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Métadonnées d'une vidéo
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoInfo {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Durée en secondes, absente pour les directs
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
}

impl VideoInfo {
    /// Vignette principale, à défaut la première de la liste
    pub fn best_thumbnail(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.thumbnails.first().map(|t| t.url.as_str()))
    }
}
