//! # sfsoundcloud - Client pour l'API SoundCloud v2
//!
//! Cette crate couvre ce dont Soundfree a besoin côté SoundCloud :
//!
//! - **client_id** : extraction d'un identifiant public depuis l'application web
//! - **resolve** : transformation d'une URL publique en piste ou en set
//! - **sets** : complétion des pistes "stub" via `/tracks?ids=`
//! - **flux** : transcodification progressive, ou HLS en clair concaténé
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use sfsoundcloud::SoundCloudClient;
//!
//! # async fn example() -> sfsoundcloud::Result<()> {
//! let client = SoundCloudClient::new()?;
//! let client_id = client.fetch_client_id().await?;
//! let track = client.track("https://soundcloud.com/artist/song", &client_id).await?;
//!
//! let mut stream = client.stream(&track, &client_id).await?;
//! while let Some(chunk) = stream.next().await {
//!     let bytes = chunk?;
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_id;
pub mod config_ext;
pub mod error;
pub mod hls;
pub mod models;

pub use client::{ClientBuilder, SoundCloudClient};
pub use config_ext::SoundCloudConfigExt;
pub use error::{Result, SoundCloudError};
pub use models::{Media, Playlist, Resource, Track, TrackUser, Transcoding, TranscodingFormat};

use bytes::Bytes;
use futures::stream::BoxStream;

/// Flux d'octets audio : paresseux, fini, annulé en le droppant
pub type AudioStream = BoxStream<'static, Result<Bytes>>;
