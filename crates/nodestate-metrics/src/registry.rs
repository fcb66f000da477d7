//! Gauge registry and Prometheus text exposition.
//!
//! Each [`MetricsRegistry`] owns its own `prometheus::Registry`, so several
//! can coexist in one process. Gauges are atomic: concurrent scrapes may
//! interleave `set` calls, and the last writer wins per gauge.

use prometheus::{Encoder, Gauge, Opts, Registry, TEXT_FORMAT, TextEncoder};
use tracing::debug;

use crate::error::{ExporterError, ExporterResult};
use crate::mapper::GaugeSet;

/// The gauges exposed for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeGauge {
    CurrentBlock,
    CurrentCumulativeWeight,
    Status,
    ConnectedPeers,
    SelfConnectedPeers,
    CandidatePeers,
    ConnectedSyncNodes,
}

impl NodeGauge {
    pub const COUNT: usize = 7;

    pub const ALL: [NodeGauge; Self::COUNT] = [
        NodeGauge::CurrentBlock,
        NodeGauge::CurrentCumulativeWeight,
        NodeGauge::Status,
        NodeGauge::ConnectedPeers,
        NodeGauge::SelfConnectedPeers,
        NodeGauge::CandidatePeers,
        NodeGauge::ConnectedSyncNodes,
    ];

    /// Position of this gauge in [`NodeGauge::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Exposed metric name.
    pub fn name(self) -> &'static str {
        match self {
            Self::CurrentBlock => "current_block",
            Self::CurrentCumulativeWeight => "current_cumulative_weight",
            Self::Status => "status",
            Self::ConnectedPeers => "connected_peers",
            Self::SelfConnectedPeers => "self_connected_peers",
            Self::CandidatePeers => "candidate_peers",
            Self::ConnectedSyncNodes => "connected_sync_nodes",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::CurrentBlock => "Latest Block known by node.",
            Self::CurrentCumulativeWeight => "Latest Cumulative Weight known by node.",
            Self::Status => "Status: PEERING=1, SYNCING=2, READY=3, MINING=4, UNKNOWN=5",
            Self::ConnectedPeers => "Current connected peers",
            Self::SelfConnectedPeers => "Current connected self peers",
            Self::CandidatePeers => "Current candidate peers",
            Self::ConnectedSyncNodes => "Current connected sync nodes",
        }
    }
}

/// Process-wide gauge state for one upstream node.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    /// Indexed by [`NodeGauge::index`].
    gauges: [Gauge; NodeGauge::COUNT],
}

impl MetricsRegistry {
    /// Create a registry with every node gauge at 0, plus the process
    /// collector on Linux.
    pub fn new() -> ExporterResult<Self> {
        let registry = Registry::new();

        let [a, b, c, d, e, f, g] =
            NodeGauge::ALL.map(|gauge| Gauge::with_opts(Opts::new(gauge.name(), gauge.help())));
        let gauges = [a?, b?, c?, d?, e?, f?, g?];

        for gauge in &gauges {
            registry.register(Box::new(gauge.clone()))?;
        }

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        debug!(gauges = gauges.len(), "metrics registry initialized");
        Ok(Self { registry, gauges })
    }

    /// Overwrite a single gauge.
    pub fn set(&self, gauge: NodeGauge, value: f64) {
        self.gauges[gauge.index()].set(value);
    }

    /// Current value of a gauge.
    pub fn get(&self, gauge: NodeGauge) -> f64 {
        self.gauges[gauge.index()].get()
    }

    /// Overwrite all gauges from one snapshot.
    pub fn apply(&self, values: &GaugeSet) {
        for (gauge, value) in values.iter() {
            self.set(gauge, value);
        }
    }

    /// Render everything registered in the Prometheus text format.
    pub fn render(&self) -> ExporterResult<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| ExporterError::Metrics(e.to_string()))
    }

    /// Content type of [`render`](Self::render) output.
    pub fn content_type(&self) -> &'static str {
        TEXT_FORMAT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of an unlabelled sample line, e.g. `status 3`.
    fn sample(output: &str, name: &str) -> Option<f64> {
        output
            .lines()
            .find_map(|line| line.strip_prefix(name)?.strip_prefix(' '))
            .and_then(|v| v.parse().ok())
    }

    #[test]
    fn new_registry_starts_at_zero() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.render().unwrap();
        for gauge in NodeGauge::ALL {
            assert_eq!(sample(&output, gauge.name()), Some(0.0), "{}", gauge.name());
        }
    }

    #[test]
    fn render_includes_help_and_type() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.render().unwrap();

        assert!(output.contains("# HELP current_block Latest Block known by node."));
        assert!(output.contains("# TYPE current_block gauge"));
        assert!(output.contains(
            "# HELP status Status: PEERING=1, SYNCING=2, READY=3, MINING=4, UNKNOWN=5"
        ));
        assert!(output.contains("# TYPE self_connected_peers gauge"));
    }

    #[test]
    fn render_reflects_latest_set() {
        let registry = MetricsRegistry::new().unwrap();
        registry.set(NodeGauge::CurrentBlock, 100.0);
        registry.set(NodeGauge::CurrentBlock, 101.0);
        registry.set(NodeGauge::CurrentCumulativeWeight, 9_876_543_210.0);

        let output = registry.render().unwrap();
        assert!(output.lines().any(|l| l == "current_block 101"));
        assert_eq!(sample(&output, "current_cumulative_weight"), Some(9_876_543_210.0));
        assert_eq!(registry.get(NodeGauge::CurrentBlock), 101.0);
    }

    #[test]
    fn render_is_idempotent() {
        let registry = MetricsRegistry::new().unwrap();
        registry.set(NodeGauge::Status, 3.0);

        let first = registry.render().unwrap();
        let second = registry.render().unwrap();
        assert_eq!(sample(&first, "status"), sample(&second, "status"));
        assert_eq!(registry.get(NodeGauge::Status), 3.0);
    }

    #[test]
    fn apply_overwrites_all_gauges() {
        let registry = MetricsRegistry::new().unwrap();
        let values = GaugeSet {
            current_block: 10.0,
            current_cumulative_weight: 20.0,
            status: 4.0,
            connected_peers: 5.0,
            self_connected_peers: 2.0,
            candidate_peers: 8.0,
            connected_sync_nodes: 1.0,
        };
        registry.apply(&values);

        for gauge in NodeGauge::ALL {
            assert_eq!(registry.get(gauge), values.value(gauge));
        }
    }

    #[test]
    fn registries_are_isolated() {
        let a = MetricsRegistry::new().unwrap();
        let b = MetricsRegistry::new().unwrap();
        a.set(NodeGauge::ConnectedPeers, 42.0);
        assert_eq!(b.get(NodeGauge::ConnectedPeers), 0.0);
    }

    #[test]
    fn clones_share_gauges() {
        let registry = MetricsRegistry::new().unwrap();
        let handle = registry.clone();
        handle.set(NodeGauge::CandidatePeers, 7.0);
        assert_eq!(registry.get(NodeGauge::CandidatePeers), 7.0);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, gauge) in NodeGauge::ALL.iter().enumerate() {
            assert_eq!(gauge.index(), i, "{}", gauge.name());
        }
    }

    #[test]
    fn every_gauge_is_independent() {
        let registry = MetricsRegistry::new().unwrap();
        for (i, gauge) in NodeGauge::ALL.into_iter().enumerate() {
            registry.set(gauge, i as f64 + 1.0);
        }

        let output = registry.render().unwrap();
        for (i, gauge) in NodeGauge::ALL.into_iter().enumerate() {
            assert_eq!(registry.get(gauge), i as f64 + 1.0);
            assert_eq!(sample(&output, gauge.name()), Some(i as f64 + 1.0));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn render_includes_process_metrics() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.render().unwrap();

        assert!(output.contains("# TYPE process_cpu_seconds_total counter"));
        assert!(output.lines().any(|l| l.starts_with("process_resident_memory_bytes ")));
    }

    #[test]
    fn content_type_is_text_exposition() {
        let registry = MetricsRegistry::new().unwrap();
        assert_eq!(registry.content_type(), "text/plain; version=0.0.4");
    }
}
