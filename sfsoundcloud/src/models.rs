//! Modèles de données de l'API SoundCloud v2

use serde::{Deserialize, Serialize};

/// Utilisateur simplifié embarqué dans les pistes et les sets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackUser {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Format d'une transcodification (protocole + type MIME)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodingFormat {
    pub protocol: String,
    pub mime_type: String,
}

/// Transcodification proposée pour une piste
///
/// `url` ne pointe pas vers l'audio : il renvoie un objet `{ "url": ... }`
/// contenant l'adresse signée du flux.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transcoding {
    pub url: String,
    pub format: TranscodingFormat,
    #[serde(default)]
    pub quality: Option<String>,
}

impl Transcoding {
    pub fn is_progressive(&self) -> bool {
        self.format.protocol == "progressive"
    }

    pub fn is_mpeg(&self) -> bool {
        self.format.mime_type.contains("mpeg")
    }

    /// HLS en clair (ni `ctr-encrypted-hls` ni `cbc-encrypted-hls`)
    pub fn is_plain_hls(&self) -> bool {
        self.format.protocol == "hls" && !self.url.contains("encrypted")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Media {
    #[serde(default)]
    pub transcodings: Vec<Transcoding>,
}

/// Piste SoundCloud
///
/// Dans les grands sets, seules les premières pistes sont complètes : les
/// suivantes ne portent que leur `id` (voir [`Track::is_complete`]).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: Option<TrackUser>,
    pub artwork_url: Option<String>,
    /// Durée en millisecondes
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub media: Option<Media>,
    pub permalink_url: Option<String>,
    /// Jeton JWT exigé par les URLs de transcodification
    pub track_authorization: Option<String>,
}

impl Track {
    /// Une piste "stub" n'a ni titre ni lien permanent
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && self.permalink_url.is_some()
    }

    /// Nom de l'auteur, si l'API l'a fourni
    pub fn artist(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Pochette de la piste, à défaut l'avatar de l'auteur
    pub fn artwork(&self) -> Option<&str> {
        self.artwork_url
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.avatar_url.as_deref()))
            .filter(|url| !url.is_empty())
    }

    fn transcodings(&self) -> &[Transcoding] {
        self.media
            .as_ref()
            .map(|m| m.transcodings.as_slice())
            .unwrap_or(&[])
    }

    /// Transcodification progressive, MP3 de préférence
    pub fn progressive_transcoding(&self) -> Option<&Transcoding> {
        let transcodings = self.transcodings();
        transcodings
            .iter()
            .find(|t| t.is_progressive() && t.is_mpeg())
            .or_else(|| transcodings.iter().find(|t| t.is_progressive()))
    }

    /// Transcodification HLS MP3 non chiffrée
    pub fn hls_transcoding(&self) -> Option<&Transcoding> {
        self.transcodings()
            .iter()
            .find(|t| t.is_plain_hls() && t.is_mpeg())
    }
}

/// Set (playlist ou album)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: Option<TrackUser>,
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub track_count: u32,
    /// Absent lorsque l'API ne renvoie pas la collection
    #[serde(default)]
    pub tracks: Option<Vec<Track>>,
}

/// Résultat de `/resolve`, discriminé par le champ `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Track(Track),
    Playlist(Playlist),
    #[serde(other)]
    Other,
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Track(_) => "track",
            Resource::Playlist(_) => "playlist",
            Resource::Other => "other",
        }
    }
}

/// Réponse d'une URL de transcodification
#[derive(Debug, Clone, Deserialize)]
pub struct StreamUrlResponse {
    pub url: String,
}
