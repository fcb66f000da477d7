//! nodestate-exporter — Prometheus exporter for a node's `getnodestate` RPC.
//!
//! Serves `/metrics`; every scrape queries the node once and renders the
//! resulting gauges.
//!
//! # Usage
//!
//! ```text
//! nodestate-exporter --rpc-address http://127.0.0.1:3032 --port :9090
//! ```

use clap::{Parser, ValueEnum};
use http::Uri;
use nodestate_metrics::config::{
    DEFAULT_LISTEN_ADDRESS, DEFAULT_RPC_ADDRESS, ListenAddr, parse_listen_addr,
    parse_rpc_address,
};
use nodestate_metrics::{Exporter, MetricsRegistry, RpcClient};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nodestate-exporter", version, about = "Node state Prometheus exporter")]
struct Cli {
    /// The address of the RPC server.
    #[arg(long, default_value = DEFAULT_RPC_ADDRESS, value_parser = parse_rpc_address)]
    rpc_address: Uri,

    /// The address to listen on for the metrics server: `:PORT`, `HOST:PORT`,
    /// or `[IPV6]:PORT`. `:PORT` listens on every IPv6 and IPv4 interface.
    #[arg(
        long = "port",
        alias = "listen-address",
        default_value = DEFAULT_LISTEN_ADDRESS,
        value_parser = parse_listen_addr
    )]
    listen: ListenAddr,

    /// Log output format.
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let registry = MetricsRegistry::new()?;
    let exporter = Exporter::new(RpcClient::new(cli.rpc_address.clone()), registry);
    let router = nodestate_api::build_router(exporter);

    let listener = nodestate_api::bind_listener(&cli.listen).await?;
    info!(
        listen = %cli.listen,
        addr = %listener.local_addr()?,
        upstream = %cli.rpc_address,
        "metrics server starting"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("metrics server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,nodestate=debug"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
    }
}
