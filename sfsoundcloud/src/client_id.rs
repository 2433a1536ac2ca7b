//! Récupération d'un `client_id` public
//!
//! L'application web de SoundCloud embarque son `client_id` dans l'un de ses
//! bundles JavaScript. On télécharge la page d'accueil, on liste les scripts
//! `crossorigin` puis on les parcourt du dernier au premier (le plus souvent
//! le bon) jusqu'à trouver un identifiant de 32 caractères.

use crate::error::{Result, SoundCloudError};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

static SCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script[^>]*\bcrossorigin\b[^>]*\bsrc="([^"]+)""#).expect("valid regex")
});

static CLIENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"client_id\s*[:=]\s*"([a-zA-Z0-9]{32})""#).expect("valid regex")
});

/// Liste les scripts de la page, résolus par rapport à `site_base`
pub fn script_urls(html: &str, site_base: &Url) -> Vec<Url> {
    SCRIPT_SRC
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|m| site_base.join(m.as_str()).ok())
        .collect()
}

/// Cherche un `client_id` dans le contenu d'un script
pub fn find_client_id(script: &str) -> Option<String> {
    CLIENT_ID
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Effectue la poignée de main complète
pub(crate) async fn scrape(client: &Client, site_base: &str, timeout: Duration) -> Result<String> {
    let base = Url::parse(site_base)?;
    debug!("Fetching SoundCloud home page {}", base);

    let response = client.get(base.clone()).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SoundCloudError::from_status_code(
            status.as_u16(),
            format!("home page returned {}", status),
        ));
    }
    let html = response.text().await?;

    let scripts = script_urls(&html, &base);
    if scripts.is_empty() {
        return Err(SoundCloudError::ClientIdNotFound(
            "no script bundle on the home page".into(),
        ));
    }

    for script_url in scripts.iter().rev() {
        debug!("Scanning script {}", script_url);
        let response = match client.get(script_url.clone()).timeout(timeout).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!("Skipping script {} ({})", script_url, r.status());
                continue;
            }
            Err(e) => {
                debug!("Skipping script {}: {}", script_url, e);
                continue;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Skipping script {}: {}", script_url, e);
                continue;
            }
        };

        if let Some(client_id) = find_client_id(&body) {
            info!("🔑 SoundCloud client_id found in {}", script_url);
            return Ok(client_id);
        }
    }

    Err(SoundCloudError::ClientIdNotFound(format!(
        "none of the {} script bundles contains one",
        scripts.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_resolved_against_the_site() {
        let html = r#"
            <script crossorigin src="https://a-v2.sndcdn.com/assets/0-abc.js"></script>
            <script src="/ignored.js"></script>
            <script crossorigin src="/assets/49-def.js"></script>
        "#;
        let base = Url::parse("https://soundcloud.com").unwrap();
        let urls: Vec<String> = script_urls(html, &base)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://a-v2.sndcdn.com/assets/0-abc.js",
                "https://soundcloud.com/assets/49-def.js"
            ]
        );
    }

    #[test]
    fn client_id_needs_32_alphanumerics() {
        let ok = r#"({client_id:"abcdefghijklmnopqrstuvwxyz012345",env:"prod"})"#;
        assert_eq!(
            find_client_id(ok).as_deref(),
            Some("abcdefghijklmnopqrstuvwxyz012345")
        );
        assert_eq!(find_client_id(r#"client_id="short""#), None);
        assert_eq!(
            find_client_id(r#"client_id = "ABCDEFGHIJKLMNOPQRSTUVWXYZ012345""#).as_deref(),
            Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ012345")
        );
    }
}
