//! Extension de sfconfig pour les réglages propres au relais

use crate::credentials::CredentialPolicy;
use anyhow::Result;
use serde_yaml::Value;
use sfconfig::Config;
use tracing::warn;

pub trait RelayConfigExt {
    /// `soundcloud.credential_policy` (`lazy` par défaut)
    fn get_credential_policy(&self) -> CredentialPolicy;

    fn set_credential_policy(&self, policy: CredentialPolicy) -> Result<()>;
}

impl RelayConfigExt for Config {
    fn get_credential_policy(&self) -> CredentialPolicy {
        match self.get_string(&["soundcloud", "credential_policy"]) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to lazy", e);
                CredentialPolicy::Lazy
            }),
            None => CredentialPolicy::default(),
        }
    }

    fn set_credential_policy(&self, policy: CredentialPolicy) -> Result<()> {
        self.set_value(
            &["soundcloud", "credential_policy"],
            Value::String(policy.to_string()),
        )
    }
}
