//! État partagé du relais

use crate::backend::{SoundCloudBackend, YoutubeBackend};
use crate::credentials::{CredentialPolicy, CredentialStore};
use std::sync::Arc;

/// Résolveurs et relais de flux, partagés entre toutes les requêtes
///
/// Les opérations sont réparties entre `metadata`, `playlist` et `stream`.
pub struct Relay {
    pub(crate) soundcloud: Arc<dyn SoundCloudBackend>,
    pub(crate) youtube: Arc<dyn YoutubeBackend>,
    pub(crate) credentials: Arc<CredentialStore>,
    pub(crate) policy: CredentialPolicy,
}

impl Relay {
    pub fn new(
        soundcloud: Arc<dyn SoundCloudBackend>,
        youtube: Arc<dyn YoutubeBackend>,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            soundcloud,
            youtube,
            credentials,
            policy: CredentialPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn policy(&self) -> CredentialPolicy {
        self.policy
    }
}
