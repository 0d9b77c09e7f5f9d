use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use brave_relay::api::create_router;
use brave_relay::config::Config;
use brave_relay::relay::StreamTranslator;
use brave_relay::upstream::BraveClient;

/// Streams Brave web-search results to clients as server-sent events.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            return Err(e.into());
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    tracing::info!(?config, "starting search relay");

    let provider = Arc::new(BraveClient::new(
        config.search_url.clone(),
        config.brave_api_key.clone(),
    ));
    let translator = Arc::new(StreamTranslator::new(provider, config.pacing));
    let app = create_router(translator);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
