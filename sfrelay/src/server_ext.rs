//! Extension de sfserver::Server pour monter le relais
//!
//! `sfserver` reste générique : c'est `sfrelay` qui ajoute ses routes au
//! serveur via ce trait.

use crate::api_rest::create_router;
use crate::backend::{SoundCloudBackend, YoutubeBackend};
use crate::config_ext::RelayConfigExt;
use crate::credentials::CredentialStore;
use crate::relay::Relay;
use anyhow::Result;
use sfconfig::Config;
use sfserver::Server;
use sfsoundcloud::{SoundCloudClient, SoundCloudConfigExt};
use sfyoutube::YoutubeClient;
use std::sync::Arc;
use tracing::info;

pub const ROOT_MESSAGE: &str = "Soundfree Backend API is running!";

/// Trait d'extension pour ajouter le relais à un serveur sfserver
///
/// # Exemple
///
/// ```rust,no_run
/// use sfrelay::RelayServerExt;
/// use sfserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///     server.init_relay_configured().await?;
///
///     server.start().await?;
///     server.wait().await;
///     Ok(())
/// }
/// ```
pub trait RelayServerExt {
    /// Enregistre les routes du relais
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /` - Message de statut
    /// - `POST /api/track/info`
    /// - `POST /api/track/download`
    /// - `POST /api/playlist/info`
    /// - `POST /api/playlist/download`
    async fn init_relay(&mut self, relay: Arc<Relay>);

    /// Construit le relais depuis la configuration puis enregistre ses routes
    ///
    /// Lance aussi, si demandé, l'acquisition du `client_id` en tâche de fond.
    async fn init_relay_configured(&mut self) -> Result<Arc<Relay>>;
}

impl RelayServerExt for Server {
    async fn init_relay(&mut self, relay: Arc<Relay>) {
        self.add_route("/", || async {
            serde_json::json!({ "message": ROOT_MESSAGE })
        })
        .await;
        self.add_router("/api", create_router(relay)).await;
    }

    async fn init_relay_configured(&mut self) -> Result<Arc<Relay>> {
        let config = sfconfig::get_config();
        let relay = Arc::new(relay_from_config(&config)?);

        if config.get_soundcloud_warm_up() {
            let credentials = relay.credentials().clone();
            tokio::spawn(async move { credentials.warm_up().await });
        }

        self.init_relay(relay.clone()).await;
        info!("🎧 Relay routes registered (credential policy: {})", relay.policy());
        Ok(relay)
    }
}

/// Construit les clients, le store d'identifiant et le relais depuis la configuration
pub fn relay_from_config(config: &Config) -> Result<Relay> {
    let soundcloud: Arc<dyn SoundCloudBackend> = Arc::new(SoundCloudClient::from_config(config)?);
    let youtube: Arc<dyn YoutubeBackend> = Arc::new(YoutubeClient::from_config(config));

    let credentials = Arc::new(CredentialStore::with_client_id(
        soundcloud.clone(),
        config.get_soundcloud_client_id(),
    ));

    Ok(Relay::new(soundcloud, youtube, credentials).with_policy(config.get_credential_policy()))
}
