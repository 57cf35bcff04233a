use tracing::info;
use tracing_subscriber::EnvFilter;

use dingtalk_relay::{config::Config, server::Server, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    info!("Loaded configuration: {:?}", config.server);

    let server = Server::new(&config);

    info!("Starting server on {}", config.server.addr());
    server.start(&config.server.addr()).await?;

    Ok(())
}
