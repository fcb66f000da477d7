//! The per-scrape pipeline: fetch, decode, map, apply, render.

use tracing::debug;

use crate::error::ExporterResult;
use crate::mapper::GaugeSet;
use crate::registry::MetricsRegistry;
use crate::rpc::RpcClient;
use crate::status::decode_node_state;

/// Ties an upstream client to the registry it feeds.
#[derive(Clone)]
pub struct Exporter {
    client: RpcClient,
    registry: MetricsRegistry,
}

impl Exporter {
    pub fn new(client: RpcClient, registry: MetricsRegistry) -> Self {
        Self { client, registry }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Run one scrape and return the rendered exposition.
    ///
    /// Gauges are only touched once the response has been fully decoded and
    /// mapped, so a failed fetch or decode leaves every gauge unchanged.
    pub async fn scrape(&self) -> ExporterResult<String> {
        let body = self.client.fetch_node_state().await?;
        let state = decode_node_state(&body)?;
        let values = GaugeSet::from_state(&state);

        self.registry.apply(&values);
        debug!(
            status = ?state.status,
            block = state.latest_block_height,
            peers = state.number_of_connected_peers,
            self_peers = values.self_connected_peers,
            "gauges updated"
        );

        self.registry.render()
    }
}
