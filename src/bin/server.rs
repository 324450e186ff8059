//! paystore Server Binary
//!
//! Opens the store and serves the payment REST API until SIGINT/SIGTERM.

use std::sync::Arc;

use clap::Parser;
use paystore::payment::Payment;
use paystore::service::{shutdown_signal, HttpServer};
use paystore::{Config, Engine};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// paystore Server
#[derive(Parser, Debug)]
#[command(name = "paystore-server")]
#[command(about = "Payment REST service backed by a single-file transactional store")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "storage.redb")]
    storage: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Bucket holding payments
    #[arg(short, long, default_value = "payment")]
    bucket: String,

    /// Page cache size in MB (store default when omitted)
    #[arg(short = 'c', long)]
    cache_mb: Option<usize>,

    /// Compact the store file on shutdown
    #[arg(long)]
    compact_on_close: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,paystore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("paystore server v{}", paystore::VERSION);
    tracing::info!("Store file: {}", args.storage);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let mut builder = Config::builder()
        .store_path(&args.storage)
        .listen_addr(&args.listen)
        .bucket(&args.bucket)
        .compact_on_close(args.compact_on_close);
    if let Some(mb) = args.cache_mb {
        builder = match builder.cache_size_mb(mb) {
            Ok(b) => b,
            Err(e) => {
                tracing::error!("Invalid --cache-mb: {}", e);
                std::process::exit(1);
            }
        };
    }
    let config = builder.build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    let payments = Arc::new(engine.bucket::<Payment>(config.bucket.clone()));
    let server = HttpServer::new(payments, &config);

    if let Err(e) = server.serve(listener, shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close store: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
