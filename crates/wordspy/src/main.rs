use tracing_subscriber::EnvFilter;

use wordspy::{ServerConfig, WordspyServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Ok(addr) = std::env::var("WORDSPY_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(dir) = std::env::var("WORDSPY_STATIC_DIR") {
        config.static_dir = dir.into();
    }

    let server = WordspyServer::bind(config).await?;
    tracing::info!(addr = %server.local_addr()?, "wordspy server running");
    server.run().await?;
    Ok(())
}
