//! Extension de sfconfig pour la section `youtube`

use sfconfig::Config;
use std::time::Duration;

use crate::client::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_YTDLP_PATH};
use crate::YoutubeClient;

pub trait YoutubeConfigExt {
    /// Chemin de l'exécutable `yt-dlp`
    fn get_ytdlp_path(&self) -> String;

    fn get_youtube_request_timeout(&self) -> Duration;
}

impl YoutubeConfigExt for Config {
    fn get_ytdlp_path(&self) -> String {
        self.get_string(&["youtube", "ytdlp_path"])
            .unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string())
    }

    fn get_youtube_request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64(
            &["youtube", "request_timeout_secs"],
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ))
    }
}

impl YoutubeClient {
    pub fn from_config(config: &Config) -> Self {
        YoutubeClient::new(config.get_ytdlp_path()).with_timeout(config.get_youtube_request_timeout())
    }
}
