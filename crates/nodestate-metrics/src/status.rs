//! `getnodestate` response decoding.
//!
//! The node answers with a JSON-RPC envelope whose `result` carries the
//! node status and peer bookkeeping. Missing or `null` fields decode to
//! their zero value; unknown fields are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{ExporterError, ExporterResult};

/// Lifecycle status reported by the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Peering,
    Syncing,
    Ready,
    Mining,
    /// Any status string this exporter does not recognize, including "".
    #[default]
    Unknown,
}

impl NodeStatus {
    /// Classify a raw status string. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Peering" => Self::Peering,
            "Syncing" => Self::Syncing,
            "Ready" => Self::Ready,
            "Mining" => Self::Mining,
            _ => Self::Unknown,
        }
    }

    /// Numeric code exposed through the `status` gauge.
    pub fn code(self) -> u8 {
        match self {
            Self::Peering => 1,
            Self::Syncing => 2,
            Self::Ready => 3,
            Self::Mining => 4,
            Self::Unknown => 5,
        }
    }
}

impl<'de> Deserialize<'de> for NodeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let status = Self::from_name(&raw);
        if status == Self::Unknown {
            debug!(status = %raw, "unrecognized node status");
        }
        Ok(status)
    }
}

/// One decoded snapshot of the node state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeStateResult {
    #[serde(deserialize_with = "null_as_default")]
    pub status: NodeStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub latest_block_height: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub latest_cumulative_weight: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_connected_peers: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_candidate_peers: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_connected_sync_nodes: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub connected_peers: Vec<String>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<NodeStateResult>,
    #[serde(default)]
    error: Option<Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a raw `getnodestate` response body.
///
/// Fails with [`ExporterError::Decode`] when the body is not JSON, is not an
/// object, has a mistyped field, or carries no `result`.
pub fn decode_node_state(body: &[u8]) -> ExporterResult<NodeStateResult> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ExporterError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(ExporterError::Decode(
            "expected a JSON-RPC response object".to_string(),
        ));
    }

    let envelope: RpcEnvelope =
        serde_json::from_value(value).map_err(|e| ExporterError::Decode(e.to_string()))?;

    match (envelope.result, envelope.error) {
        (Some(result), _) => Ok(result),
        (None, Some(error)) => Err(ExporterError::Decode(format!(
            "node returned an RPC error: {error}"
        ))),
        (None, None) => Err(ExporterError::Decode(
            "response has no `result` field".to_string(),
        )),
    }
}
