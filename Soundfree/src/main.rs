use sfrelay::RelayServerExt;
use sfserver::ServerBuilder;
use sfserver::logs::{LoggingOptions, init_logging};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Un fichier .env absent n'est pas une erreur
    if dotenv::dotenv().is_err() {
        eprintln!("No .env file found, using the process environment");
    }

    init_logging(LoggingOptions::from_config());

    // ========== PHASE 1 : Configuration ==========
    let config = sfconfig::get_config();
    info!("⚙️ Configuration loaded from {}", config.config_dir());

    // ========== PHASE 2 : Routes du relais ==========
    let mut server = ServerBuilder::new_configured().build();

    info!("🎧 Initializing audio relay...");
    let relay = server.init_relay_configured().await?;
    if relay.credentials().get().is_none() {
        warn!("⚠️ No SoundCloud client_id configured, it will be scraped from soundcloud.com");
    }

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ Soundfree backend is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
