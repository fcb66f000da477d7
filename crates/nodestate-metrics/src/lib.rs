//! nodestate-metrics — on-demand metrics for a node's `getnodestate` RPC.
//!
//! Each scrape fetches the node state over JSON-RPC, decodes it, maps it
//! onto a fixed set of gauges, and renders the Prometheus text exposition.
//! Nothing runs between scrapes.
//!
//! # Architecture
//!
//! ```text
//! Exporter::scrape()
//!   ├── RpcClient::fetch_node_state()  → raw body     (ExporterError::Fetch)
//!   ├── decode_node_state()            → NodeStateResult (ExporterError::Decode)
//!   ├── GaugeSet::from_state()         → seven gauge values
//!   ├── MetricsRegistry::apply()       → overwrite gauges
//!   └── MetricsRegistry::render()      → text/plain exposition
//! ```

pub mod config;
pub mod error;
pub mod exporter;
pub mod mapper;
pub mod registry;
pub mod rpc;
pub mod status;

pub use error::{ExporterError, ExporterResult};
pub use exporter::Exporter;
pub use mapper::{GaugeSet, count_self_peers};
pub use registry::{MetricsRegistry, NodeGauge};
pub use rpc::RpcClient;
pub use status::{NodeStateResult, NodeStatus, decode_node_state};
