use hive_registry::{
    api::Server,
    config::Config,
    registry::Registry,
    state::{MemoryStore, SqliteStore},
};
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// The main entry point for the registry service.
///
/// Initializes logging, loads configuration (path from the first argument, or
/// `config/default.toml`), opens the configured store and serves the API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&path)?;
    info!("Registry starting with config: {:?}", config);

    match &config.database {
        Some(database) => {
            let store = SqliteStore::open(&database.url).await?;
            let registry = Registry::new(store)?;
            Server::new(config.api.clone(), registry).start().await?;
        }
        None => {
            warn!("No [database] section configured; records will not survive a restart");
            let registry = Registry::new(MemoryStore::new())?;
            Server::new(config.api.clone(), registry).start().await?;
        }
    }

    Ok(())
}
