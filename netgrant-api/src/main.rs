//! HTTP API entry point for object-group access changes

use anyhow::Context;
use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use netgrant_core::Store;
use netgrant_device::SshGateway;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::filter::EnvFilter;

mod server;

use server::{handle_request, ApiContext};

#[derive(Parser, Debug)]
#[command(name = "netgrant-api")]
#[command(about = "HTTP API pushing object-group access changes to the firewall")]
struct Args {
    /// Address and port to listen on
    #[arg(long, default_value = "127.0.0.1:8088")]
    listen: String,

    /// Save the device configuration after every applied change
    #[arg(long, short = 's')]
    save: bool,

    /// Policy document path
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Credentials document path
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let env_filter = if args.verbose {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration once; shared read-only across connection tasks
    let store = Arc::new(
        Store::load(args.policy, args.credentials).context("Failed to load configuration")?,
    );

    let gateway = Arc::new(SshGateway::new(store.credentials().clone()));
    let ctx = ApiContext {
        store,
        gateway,
        save: args.save,
    };

    let addr = args
        .listen
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Access API listening on {addr}");

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        tracing::debug!("API client connected: {peer_addr}");

        let ctx = ctx.clone();
        // Spawn a task to handle this connection
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| handle_request(req, ctx.clone()));

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!("Connection error from {peer_addr}: {e}");
            }
        });
    }
}
