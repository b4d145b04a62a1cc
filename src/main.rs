//! Flood prediction API
//!
//! Loads a pre-trained flood classifier once at startup and serves severity
//! predictions over HTTP.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use flood_api::{server, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "flood-api")]
#[command(about = "Flood severity prediction service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Model artifact path (.onnx or .json)
    #[arg(short, long, env = "FLOOD_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "FLOOD_API_PORT")]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = ServiceConfig::load(&cli.config)?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    info!("Model path: {}", config.model_path.display());
    info!("API prefix: {}", config.api_prefix);

    server::run(config).await
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("flood_api=debug,actix_web=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("flood_api=info,actix_web=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
