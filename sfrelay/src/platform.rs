//! Sélection de la plateforme par simple recherche de sous-chaîne

use crate::error::{RelayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    SoundCloud,
    YouTube,
}

impl Platform {
    /// `soundcloud.com` l'emporte sur `youtube.com` / `youtu.be`
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("soundcloud.com") {
            Some(Platform::SoundCloud)
        } else if url.contains("youtube.com") || url.contains("youtu.be") {
            Some(Platform::YouTube)
        } else {
            None
        }
    }

    pub fn require(url: &str) -> Result<Self> {
        Self::detect(url).ok_or_else(|| {
            RelayError::InvalidRequest(
                "Unsupported URL: only SoundCloud and YouTube links are accepted".to_string(),
            )
        })
    }
}

/// URL d'un set SoundCloud
pub fn is_soundcloud_playlist(url: &str) -> bool {
    url.contains("soundcloud.com") && url.contains("/sets/")
}

/// URL présente et non vide
pub fn require_url(url: Option<&str>) -> Result<&str> {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(RelayError::missing_url()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_platforms() {
        assert_eq!(
            Platform::detect("https://soundcloud.com/artist/track"),
            Some(Platform::SoundCloud)
        );
        assert_eq!(
            Platform::detect("https://www.youtube.com/watch?v=abc"),
            Some(Platform::YouTube)
        );
        assert_eq!(Platform::detect("https://youtu.be/abc"), Some(Platform::YouTube));
        assert_eq!(Platform::detect("https://vimeo.com/1"), None);
    }

    #[test]
    fn playlist_urls_need_sets() {
        assert!(is_soundcloud_playlist("https://soundcloud.com/artist/sets/mix"));
        assert!(!is_soundcloud_playlist("https://soundcloud.com/artist/track"));
        assert!(!is_soundcloud_playlist("https://example.com/sets/mix"));
    }

    #[test]
    fn blank_url_is_missing() {
        assert!(require_url(None).is_err());
        assert!(require_url(Some("   ")).is_err());
        assert_eq!(require_url(Some(" https://youtu.be/x ")).unwrap(), "https://youtu.be/x");
    }
}
