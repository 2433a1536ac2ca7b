//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module cache la configuration d'Axum derrière un `Server` qui accumule
//! les routes puis les sert derrière les couches communes :
//!
//! - `CatchPanicLayer` : une panique devient `500 {"error": "Something broke!"}`
//! - `TraceLayer` : chaque requête HTTP est tracée
//! - `CorsLayer` : origines autorisées issues de la configuration

use anyhow::Context;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use sfconfig::get_config;
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal, sync::RwLock, task::JoinHandle};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Serveur principal
pub struct Server {
    name: String,
    http_port: u16,
    allowed_origins: Vec<String>,
    router: Arc<RwLock<Router>>,
    local_addr: Option<SocketAddr>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `http_port` - Port HTTP à écouter (0 pour un port éphémère)
    /// * `allowed_origins` - Origines CORS autorisées (`"*"` pour toutes)
    pub fn new(name: impl Into<String>, http_port: u16, allowed_origins: Vec<String>) -> Self {
        Self {
            name: name.into(),
            http_port,
            allowed_origins,
            router: Arc::new(RwLock::new(Router::new())),
            local_addr: None,
            join_handle: None,
        }
    }

    pub fn new_configured() -> Self {
        ServerBuilder::new_configured().build()
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie sera appelée à chaque requête GET sur le chemin spécifié.
    ///
    /// ```rust,no_run
    /// # use sfserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", 3000, vec![]);
    /// server.add_route("/", || async {
    ///     serde_json::json!({ "message": "running" })
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };

        let route = Router::new().route(path, get(handler));

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(route);
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;

        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Construit l'application finale : routes enregistrées + couches communes
    ///
    /// Utilisé par [`Server::start`] et par les tests (`oneshot`).
    pub async fn app(&self) -> Router {
        let routes = self.router.read().await.clone();
        routes
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.allowed_origins))
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est lié avant le retour, une erreur de bind est donc remontée
    /// à l'appelant. Le service tourne ensuite en tâche de fond jusqu'à Ctrl+C.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let app = self.app().await;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);

        info!("🚀 Server {} running at http://{}", self.name, local_addr);

        let name = self.name.clone();
        self.join_handle = Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                error!("Server {} failed: {}", name, e);
            }
            info!("Server {} stopped", name);
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Adresse effectivement liée, une fois le serveur démarré
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Unhandled failure in request handler: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Something broke!" })),
    )
        .into_response()
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(AnyOrigin);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    http_port: u16,
    allowed_origins: Vec<String>,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            allowed_origins: Vec::new(),
        }
    }

    /// Builder initialisé depuis la configuration globale
    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: "Soundfree-Server".to_string(),
            http_port: config.get_http_port(),
            allowed_origins: config.get_allowed_origins(),
        }
    }

    pub fn allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.http_port, self.allowed_origins)
    }
}
