//! # sfyoutube - Accès à l'audio YouTube via yt-dlp
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use sfyoutube::YoutubeClient;
//!
//! # async fn example() -> sfyoutube::Result<()> {
//! let client = YoutubeClient::default();
//! let info = client.video_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//! println!("{} ({:?} s)", info.title, info.duration);
//!
//! let mut audio = client.audio_stream("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//! while let Some(chunk) = audio.next().await {
//!     let _bytes = chunk?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config_ext;
pub mod error;
pub mod models;

pub use client::YoutubeClient;
pub use config_ext::YoutubeConfigExt;
pub use error::{Result, YoutubeError};
pub use models::{Thumbnail, VideoInfo};

use bytes::Bytes;
use futures::stream::BoxStream;

/// Sortie standard de `yt-dlp`, tuée lorsque le flux est droppé
pub type AudioStream = BoxStream<'static, Result<Bytes>>;
