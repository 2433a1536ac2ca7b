//! Taxonomie des échecs du relais
//!
//! Chaque opération des résolveurs et du relais renvoie un [`RelayError`] ;
//! la couche HTTP le traduit en code de statut et en corps JSON
//! (voir `api_rest`).

use std::fmt;
use thiserror::Error;

/// Type Result personnalisé pour sfrelay
pub type Result<T> = std::result::Result<T, RelayError>;

/// Nature de la ressource dont la résolution a échoué
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Track,
    Playlist,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Track => f.write_str("track"),
            Resource::Playlist => f.write_str("playlist"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    /// Requête invalide (URL absente, plateforme non supportée...)
    #[error("{0}")]
    InvalidRequest(String),

    /// Configuration serveur incomplète
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// La plateforme n'a pas su décrire la ressource
    #[error("Failed to get {resource} information: {message}")]
    UpstreamResolution { resource: Resource, message: String },

    /// Le flux audio n'a pas pu être ouvert ou s'est interrompu
    #[error("Download failed: {0}")]
    UpstreamStreaming(String),

    /// La poignée de main SoundCloud a échoué
    #[error("Failed to acquire SoundCloud client id: {0}")]
    CredentialAcquisition(String),
}

impl RelayError {
    pub fn missing_url() -> Self {
        Self::InvalidRequest("URL is required".to_string())
    }

    pub fn resolution(resource: Resource) -> impl FnOnce(String) -> Self {
        move |message| Self::UpstreamResolution { resource, message }
    }

    /// Message court exposé dans le champ `error`
    pub fn summary(&self) -> String {
        match self {
            RelayError::InvalidRequest(msg) => msg.clone(),
            RelayError::Configuration(_) => "Server configuration error".to_string(),
            RelayError::UpstreamResolution { resource, .. } => {
                format!("Failed to get {} information", resource)
            }
            RelayError::UpstreamStreaming(_) => "Download failed".to_string(),
            RelayError::CredentialAcquisition(_) => {
                "Failed to acquire SoundCloud client id".to_string()
            }
        }
    }

    /// Détail technique exposé dans le champ `details`
    pub fn details(&self) -> Option<&str> {
        match self {
            RelayError::InvalidRequest(_) => None,
            RelayError::Configuration(d)
            | RelayError::UpstreamStreaming(d)
            | RelayError::CredentialAcquisition(d) => Some(d),
            RelayError::UpstreamResolution { message, .. } => Some(message),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_the_resource() {
        let err = RelayError::resolution(Resource::Playlist)("set is private".to_string());
        assert_eq!(err.summary(), "Failed to get playlist information");
        assert_eq!(err.details(), Some("set is private"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn invalid_request_has_no_details() {
        let err = RelayError::missing_url();
        assert_eq!(err.summary(), "URL is required");
        assert_eq!(err.details(), None);
        assert!(err.is_client_error());
    }
}
