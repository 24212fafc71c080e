use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use vodserver::config::Config;
use vodserver::server;

/// Static content server with chunked delivery of large files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on (overrides the config file)
    port: Option<u16>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve files from
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Maximum number of concurrently served connections
    #[arg(long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    if let Some(root) = args.root {
        cfg.content.root = root;
    }
    if args.max_connections.is_some() {
        cfg.server.max_connections = args.max_connections;
    }
    cfg.validate()?;

    let level = cfg.log.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .init();

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
