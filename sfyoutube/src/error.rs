//! Gestion des erreurs pour le client YouTube

use std::time::Duration;
use thiserror::Error;

/// Type Result personnalisé pour sfyoutube
pub type Result<T> = std::result::Result<T, YoutubeError>;

#[derive(Error, Debug)]
pub enum YoutubeError {
    /// yt-dlp introuvable ou non exécutable
    #[error("Failed to run yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    /// yt-dlp a terminé en erreur
    #[error("yt-dlp failed ({}): {stderr}", exit_code(.code))]
    Failed { code: Option<i32>, stderr: String },

    /// yt-dlp n'a pas répondu à temps
    #[error("yt-dlp timed out after {0:?}")]
    Timeout(Duration),

    /// Sortie JSON illisible
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de lecture du pipe
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "killed by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_carries_stderr() {
        let err = YoutubeError::Failed {
            code: Some(1),
            stderr: "ERROR: Video unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "yt-dlp failed (exit code 1): ERROR: Video unavailable"
        );
    }
}
