use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tollgate::database::UserStore;
use tollgate::mail::LogOnlyMailer;
use tollgate::{AppState, RequestPipeline};
use tollgate_shared::config::load_config;

#[derive(Debug, Parser)]
#[command(name = "tollgate", version, about = "Request gatekeeper")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    info!("Loaded config from {}", cli.config.display());

    let addr: SocketAddr = config
        .server
        .addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.addr()))?;
    let sweep_interval = Duration::from_secs(config.session.sweep_interval_secs.max(1));

    let users = UserStore::connect(&config.database.url).await?;
    let state = AppState::new(config, users, Arc::new(LogOnlyMailer))?;
    let sweeper = state.sessions.spawn_sweeper(sweep_interval);
    let pipeline = RequestPipeline::new(state)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        };

        let io = TokioIo::new(stream);
        let pipeline = pipeline.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let pipeline = pipeline.clone();
                async move { Ok::<_, Infallible>(pipeline.handle_incoming(req).await) }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}
