use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use webhook_relay::config::{loader, RelayConfig};
use webhook_relay::observability::init_logging;
use webhook_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "webhook-relay", version)]
#[command(about = "Relay inbound webhook POSTs to a single backend", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override backend.url.
    #[arg(long)]
    backend_url: Option<String>,

    /// Override backend.timeout_secs.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, loader::ConfigError> {
        let mut config = match &self.config {
            Some(path) => loader::read_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(url) = self.backend_url {
            config.backend.url = url;
        }
        if let Some(secs) = self.timeout_secs {
            config.backend.timeout_secs = secs;
        }

        loader::check(&config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    init_logging(&config.observability)?;

    tracing::info!("webhook-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.url,
        timeout_secs = config.backend.timeout_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(config.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    shutdown.trigger_on_ctrl_c();
    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
