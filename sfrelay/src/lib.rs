//! # sfrelay - Relais audio SoundCloud / YouTube
//!
//! Reçoit une URL de média, en décrit le contenu et relaie l'audio vers
//! l'appelant sous forme de fichier téléchargeable. Toute la résolution est
//! déléguée aux clients de plateforme (`sfsoundcloud`, `sfyoutube`) ; le
//! relais transfère les octets et traduit les échecs en réponses HTTP.
//!
//! ## Composants
//!
//! - [`credentials`] : cache du `client_id` SoundCloud
//! - [`metadata`] : titre, durée et vignette d'une piste
//! - [`playlist`] : pistes d'un set SoundCloud
//! - [`stream`] : relais du flux audio avec en-têtes de pièce jointe
//! - [`api_rest`] : routes HTTP et traduction des erreurs
//! - [`server_ext`] : montage sur un `sfserver::Server`

pub mod api_rest;
pub mod backend;
pub mod config_ext;
pub mod credentials;
pub mod error;
pub mod metadata;
pub mod models;
pub mod platform;
pub mod playlist;
pub mod relay;
pub mod server_ext;
pub mod stream;

pub use api_rest::{create_router, UrlPayload};
pub use backend::{SoundCloudBackend, YoutubeBackend};
pub use config_ext::RelayConfigExt;
pub use credentials::{CredentialPolicy, CredentialStore};
pub use error::{RelayError, Resource, Result};
pub use models::{PlaylistInfo, TrackInfo, TrackRef};
pub use platform::Platform;
pub use relay::Relay;
pub use server_ext::{relay_from_config, RelayServerExt};
pub use stream::{sanitize_filename, TrackDownload};
