//! Tests against a fake `yt-dlp` shell script
#![cfg(unix)]

use futures::StreamExt;
use sfyoutube::{YoutubeClient, YoutubeError};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn fake_ytdlp(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("yt-dlp");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const WORKING: &str = r#"
case "$1" in
  -J)
    echo '{"id":"abc","title":"Never Gonna Give You Up","duration":212.0,"thumbnail":"https://i.ytimg.com/vi/abc/maxres.jpg"}'
    ;;
  -f)
    printf 'first-'
    printf 'second'
    ;;
esac
"#;

async fn drain(client: &YoutubeClient) -> (Vec<u8>, Option<YoutubeError>) {
    let mut stream = client
        .audio_stream("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(b) => bytes.extend_from_slice(&b),
            Err(e) => return (bytes, Some(e)),
        }
    }
    (bytes, None)
}

#[tokio::test]
async fn video_info_parses_json_dump() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(fake_ytdlp(&dir, WORKING));

    let info = client
        .video_info("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();

    assert_eq!(info.title, "Never Gonna Give You Up");
    assert_eq!(info.duration, Some(212.0));
    assert_eq!(
        info.best_thumbnail(),
        Some("https://i.ytimg.com/vi/abc/maxres.jpg")
    );
}

#[tokio::test]
async fn video_info_reports_stderr_on_failure() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(fake_ytdlp(
        &dir,
        "echo 'ERROR: [youtube] abc: Video unavailable' >&2\nexit 1",
    ));

    let err = client
        .video_info("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();

    match err {
        YoutubeError::Failed { code, stderr } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("Video unavailable"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn video_info_times_out() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(fake_ytdlp(&dir, "sleep 5"))
        .with_timeout(Duration::from_millis(200));

    let err = client
        .video_info("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();
    assert!(matches!(err, YoutubeError::Timeout(_)));
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(dir.path().join("does-not-exist"));

    let err = client
        .video_info("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();
    assert!(matches!(err, YoutubeError::Spawn(_)));
}

#[tokio::test]
async fn audio_stream_relays_stdout() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(fake_ytdlp(&dir, WORKING));

    let (bytes, error) = drain(&client).await;
    assert!(error.is_none());
    assert_eq!(bytes, b"first-second");
}

#[tokio::test]
async fn audio_stream_ends_with_error_on_failed_exit() {
    let dir = TempDir::new().unwrap();
    let client = YoutubeClient::new(fake_ytdlp(
        &dir,
        "printf 'partial'\necho 'ERROR: fragment 3 not found' >&2\nexit 2",
    ));

    let (bytes, error) = drain(&client).await;
    assert_eq!(bytes, b"partial");
    match error {
        Some(YoutubeError::Failed { code, stderr }) => {
            assert_eq!(code, Some(2));
            assert!(stderr.contains("fragment 3 not found"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

/// Processus terminé ou zombie en attente de récolte
#[cfg(target_os = "linux")]
fn process_is_gone(pid: &str) -> bool {
    match fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Err(_) => true,
        Ok(stat) => stat
            .rsplit_once(')')
            .map(|(_, rest)| rest.trim_start().starts_with('Z'))
            .unwrap_or(false),
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn dropping_the_stream_kills_yt_dlp() {
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("pid");
    let script = format!(
        "echo $$ > '{}'\nprintf 'chunk'\nexec sleep 30",
        pid_file.display()
    );
    let client = YoutubeClient::new(fake_ytdlp(&dir, &script));

    let mut stream = client
        .audio_stream("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), &b"chunk"[..]);

    let pid = fs::read_to_string(&pid_file).unwrap().trim().to_string();
    assert!(!process_is_gone(&pid));

    drop(stream);

    let mut gone = false;
    for _ in 0..50 {
        if process_is_gone(&pid) {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(gone, "yt-dlp (pid {}) still running after the stream was dropped", pid);
}
