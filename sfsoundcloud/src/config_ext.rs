//! Extension pour intégrer la configuration SoundCloud dans sfconfig
//!
//! Section `soundcloud` du fichier de configuration :
//!
//! ```yaml
//! soundcloud:
//!   client_id: ""            # ou variable SOUNDCLOUD_CLIENT_ID
//!   warm_up: true
//!   request_timeout_secs: 30
//! ```

use anyhow::Result;
use serde_yaml::Value;
use sfconfig::Config;
use std::time::Duration;

use crate::client::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Trait d'extension pour la configuration SoundCloud
pub trait SoundCloudConfigExt {
    /// `client_id` fourni par l'opérateur, s'il y en a un
    fn get_soundcloud_client_id(&self) -> Option<String>;

    fn set_soundcloud_client_id(&self, client_id: &str) -> Result<()>;

    /// Acquérir le `client_id` dès le démarrage
    fn get_soundcloud_warm_up(&self) -> bool;

    /// Timeout des appels JSON
    fn get_soundcloud_request_timeout(&self) -> Duration;
}

impl SoundCloudConfigExt for Config {
    fn get_soundcloud_client_id(&self) -> Option<String> {
        self.get_string(&["soundcloud", "client_id"])
    }

    fn set_soundcloud_client_id(&self, client_id: &str) -> Result<()> {
        self.set_value(
            &["soundcloud", "client_id"],
            Value::String(client_id.to_string()),
        )
    }

    fn get_soundcloud_warm_up(&self) -> bool {
        self.get_bool(&["soundcloud", "warm_up"], true)
    }

    fn get_soundcloud_request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64(
            &["soundcloud", "request_timeout_secs"],
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ))
    }
}

impl crate::SoundCloudClient {
    /// Client construit depuis la configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Self::builder()
            .timeout(config.get_soundcloud_request_timeout())
            .build()
    }
}
