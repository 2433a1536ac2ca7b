//! Gestion des erreurs pour le client SoundCloud

use thiserror::Error;

/// Type Result personnalisé pour sfsoundcloud
pub type Result<T> = std::result::Result<T, SoundCloudError>;

/// Erreurs possibles lors de l'utilisation du client SoundCloud
#[derive(Error, Debug)]
pub enum SoundCloudError {
    /// client_id refusé ou ressource privée
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Ressource non trouvée (track, set, URL inconnue)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// URL invalide
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Erreur de l'API SoundCloud
    #[error("SoundCloud API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Aucun client_id trouvé dans les scripts de l'application web
    #[error("Could not find a client_id: {0}")]
    ClientIdNotFound(String),

    /// La ressource résolue n'est pas du type attendu
    #[error("Unexpected resource: expected {expected}, got {got}")]
    UnexpectedKind { expected: &'static str, got: String },

    /// Set sans collection de pistes
    #[error("Playlist response has no track collection")]
    MissingTracks,

    /// Aucun flux exploitable pour la piste
    #[error("No playable stream: {0}")]
    NoStream(String),

    /// Playlist HLS illisible ou non supportée
    #[error("HLS error: {0}")]
    Hls(String),
}

impl SoundCloudError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur provient d'un client_id refusé
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SoundCloudError::Unauthorized(_))
    }
}
