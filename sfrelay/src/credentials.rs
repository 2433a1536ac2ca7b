//! Cache du `client_id` SoundCloud
//!
//! États : `Unset → Set`. Le passage à `Set` se fait une seule fois, soit à la
//! construction (identifiant fourni par la configuration), soit à la première
//! poignée de main réussie. Les appels concurrents pendant la première
//! acquisition attendent la même poignée de main ; un échec laisse l'état
//! `Unset` et le prochain appel retente.

use crate::backend::SoundCloudBackend;
use crate::error::{RelayError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Politique d'obtention de l'identifiant pour les routes `playlist`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Poignée de main à la demande, comme pour les pistes
    #[default]
    Lazy,
    /// L'identifiant doit venir de la configuration, sinon erreur immédiate
    PreProvisioned,
}

impl FromStr for CredentialPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "lazy" => Ok(CredentialPolicy::Lazy),
            "preprovisioned" => Ok(CredentialPolicy::PreProvisioned),
            other => Err(format!("unknown credential policy '{}'", other)),
        }
    }
}

impl fmt::Display for CredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialPolicy::Lazy => f.write_str("lazy"),
            CredentialPolicy::PreProvisioned => f.write_str("pre_provisioned"),
        }
    }
}

pub struct CredentialStore {
    cell: OnceCell<String>,
    configured: bool,
    backend: Arc<dyn SoundCloudBackend>,
}

impl CredentialStore {
    /// Store vide : la première utilisation déclenchera la poignée de main
    pub fn new(backend: Arc<dyn SoundCloudBackend>) -> Self {
        Self {
            cell: OnceCell::new(),
            configured: false,
            backend,
        }
    }

    /// Store pré-rempli par la configuration (ignoré si vide)
    pub fn with_client_id(backend: Arc<dyn SoundCloudBackend>, client_id: Option<String>) -> Self {
        match client_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                info!("🔑 Using SoundCloud client_id from configuration");
                Self {
                    cell: OnceCell::new_with(Some(id.trim().to_string())),
                    configured: true,
                    backend,
                }
            }
            None => Self::new(backend),
        }
    }

    /// Identifiant en cache, sans accès réseau
    pub fn get(&self) -> Option<&str> {
        self.cell.get().map(String::as_str)
    }

    /// Identifiant fourni par la configuration
    pub fn configured(&self) -> Option<&str> {
        if self.configured {
            self.get()
        } else {
            None
        }
    }

    /// Renvoie l'identifiant, en l'acquérant au besoin
    pub async fn ensure(&self) -> Result<String> {
        self.cell
            .get_or_try_init(|| async {
                info!("No SoundCloud client_id cached, starting handshake");
                let id = self
                    .backend
                    .fetch_client_id()
                    .await
                    .map_err(|e| RelayError::CredentialAcquisition(e.to_string()))?;
                info!("✅ SoundCloud client_id acquired");
                Ok::<_, RelayError>(id)
            })
            .await
            .cloned()
    }

    /// Identifiant selon la politique choisie
    pub async fn for_policy(&self, policy: CredentialPolicy) -> Result<String> {
        match policy {
            CredentialPolicy::Lazy => self.ensure().await,
            CredentialPolicy::PreProvisioned => self
                .configured()
                .map(str::to_string)
                .ok_or_else(|| {
                    warn!("SoundCloud client_id required by configuration but not provided");
                    RelayError::Configuration(
                        "SoundCloud client id is not configured (set SOUNDCLOUD_CLIENT_ID)"
                            .to_string(),
                    )
                }),
        }
    }

    /// Acquisition au démarrage : un échec est journalisé, jamais fatal
    pub async fn warm_up(&self) {
        if self.get().is_some() {
            return;
        }
        match self.ensure().await {
            Ok(_) => info!("SoundCloud client_id initialized successfully"),
            Err(e) => warn!("⚠️ Failed to initialize SoundCloud client_id: {}", e),
        }
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("set", &self.cell.initialized())
            .field("configured", &self.configured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_common_spellings() {
        assert_eq!("lazy".parse::<CredentialPolicy>(), Ok(CredentialPolicy::Lazy));
        for s in ["pre_provisioned", "pre-provisioned", "PreProvisioned"] {
            assert_eq!(s.parse::<CredentialPolicy>(), Ok(CredentialPolicy::PreProvisioned));
        }
        assert!("eager".parse::<CredentialPolicy>().is_err());
    }
}
