//! # sfserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP de
//! Soundfree avec Axum.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : routes JSON avec `add_route()`, sous-routers avec `add_router()`
//! - 🌐 **CORS** : origines autorisées issues de la configuration
//! - 🧯 **Filet de sécurité** : une panique dans un handler devient une réponse 500 JSON
//! - 📜 **Logs** : initialisation de `tracing` via [`logs::init_logging`]
//! - ⚡ **Arrêt gracieux** : gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use sfserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", 8080).build();
//!
//!     server.add_route("/", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use server::{Server, ServerBuilder};
