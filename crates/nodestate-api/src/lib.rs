//! nodestate-api — HTTP surface of the node state exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | any | `/metrics` | Scrape the node and return Prometheus exposition |

pub mod handlers;

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use axum::Router;
use axum::routing::any;
use nodestate_metrics::Exporter;
use nodestate_metrics::config::ListenAddr;
use tokio::net::TcpListener;
use tracing::warn;

/// Shared state for the handlers.
#[derive(Clone)]
pub struct ApiState {
    pub exporter: Exporter,
}

/// Build the exporter router.
pub fn build_router(exporter: Exporter) -> Router {
    let state = ApiState { exporter };

    Router::new()
        .route("/metrics", any(handlers::scrape_metrics))
        .with_state(state)
}

/// Bind the metrics listener.
///
/// [`ListenAddr::AllInterfaces`] binds `[::]`, which also accepts IPv4 on
/// dual-stack hosts, and falls back to `0.0.0.0` when IPv6 is unavailable.
/// Host names are resolved here.
pub async fn bind_listener(addr: &ListenAddr) -> io::Result<TcpListener> {
    match addr {
        ListenAddr::AllInterfaces(port) => {
            match TcpListener::bind((Ipv6Addr::UNSPECIFIED, *port)).await {
                Ok(listener) => Ok(listener),
                Err(e) => {
                    warn!(error = %e, port, "IPv6 bind failed, listening on IPv4 only");
                    TcpListener::bind((Ipv4Addr::UNSPECIFIED, *port)).await
                }
            }
        }
        ListenAddr::Host(host, port) => TcpListener::bind((host.as_str(), *port)).await,
    }
}
