//! Maps a decoded node state onto gauge values.

use crate::registry::NodeGauge;
use crate::status::NodeStateResult;

/// Address prefix of peers that belong to the operator's own fleet.
pub const SELF_PEER_PREFIX: &str = "172.16.";

/// Gauge values derived from one node state snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaugeSet {
    pub current_block: f64,
    pub current_cumulative_weight: f64,
    pub status: f64,
    pub connected_peers: f64,
    pub self_connected_peers: f64,
    pub candidate_peers: f64,
    pub connected_sync_nodes: f64,
}

impl GaugeSet {
    /// Map a snapshot. Total over any decoded state.
    pub fn from_state(state: &NodeStateResult) -> Self {
        Self {
            current_block: state.latest_block_height as f64,
            current_cumulative_weight: state.latest_cumulative_weight as f64,
            status: f64::from(state.status.code()),
            connected_peers: state.number_of_connected_peers as f64,
            self_connected_peers: count_self_peers(&state.connected_peers) as f64,
            candidate_peers: state.number_of_candidate_peers as f64,
            connected_sync_nodes: state.number_of_connected_sync_nodes as f64,
        }
    }

    /// Value for a single gauge.
    pub fn value(&self, gauge: NodeGauge) -> f64 {
        match gauge {
            NodeGauge::CurrentBlock => self.current_block,
            NodeGauge::CurrentCumulativeWeight => self.current_cumulative_weight,
            NodeGauge::Status => self.status,
            NodeGauge::ConnectedPeers => self.connected_peers,
            NodeGauge::SelfConnectedPeers => self.self_connected_peers,
            NodeGauge::CandidatePeers => self.candidate_peers,
            NodeGauge::ConnectedSyncNodes => self.connected_sync_nodes,
        }
    }

    /// All seven `(gauge, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeGauge, f64)> + '_ {
        NodeGauge::ALL.iter().map(|&g| (g, self.value(g)))
    }
}

/// Count connected peers whose address starts with [`SELF_PEER_PREFIX`].
///
/// This is a literal prefix test on the address string; no resolution or
/// CIDR math is involved.
pub fn count_self_peers<S: AsRef<str>>(peers: &[S]) -> usize {
    peers
        .iter()
        .filter(|p| p.as_ref().starts_with(SELF_PEER_PREFIX))
        .count()
}
