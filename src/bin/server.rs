use tagleak::{init_logging, serve, Authenticator, ServerConfig};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::parse();
    init_logging(config.log_file.as_deref())?;

    let limits = config.limits()?;
    let authenticator = Arc::new(Authenticator::new(config.secret.as_bytes(), limits));

    let listener = TcpListener::bind(config.bind_address()).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        max_delay = limits.max_delay(),
        max_user = limits.max_user(),
        tag_len = limits.tag_len(),
        "listening"
    );
    serve(listener, authenticator).await?;
    Ok(())
}
