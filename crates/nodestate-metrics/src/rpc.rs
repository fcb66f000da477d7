//! JSON-RPC client for the node's `getnodestate` method.
//!
//! One POST per call, no retries, and no timeout beyond what the transport
//! applies by default. The underlying pooled client is shared by clones.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::{ExporterError, ExporterResult};

/// Pre-serialized `getnodestate` request.
pub const GET_NODE_STATE_REQUEST: &str =
    r#"{"jsonrpc":"2.0","id":"documentation","method":"getnodestate","params":[]}"#;

const CLIENT_USER_AGENT: &str = concat!("nodestate-exporter/", env!("CARGO_PKG_VERSION"));

/// Client bound to a single upstream RPC address.
#[derive(Clone)]
pub struct RpcClient {
    address: Uri,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl RpcClient {
    pub fn new(address: Uri) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { address, client }
    }

    /// The upstream address requests are sent to.
    pub fn address(&self) -> &Uri {
        &self.address
    }

    /// Send `getnodestate` and return the raw response body.
    ///
    /// Connection errors, non-2xx statuses, and body read errors all map to
    /// [`ExporterError::Fetch`].
    pub async fn fetch_node_state(&self) -> ExporterResult<Bytes> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.address.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .body(Full::new(Bytes::from_static(GET_NODE_STATE_REQUEST.as_bytes())))
            .map_err(|e| ExporterError::Fetch(e.to_string()))?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| ExporterError::Fetch(format!("request to {} failed: {e}", self.address)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExporterError::Fetch(format!(
                "{} answered with HTTP {status}",
                self.address
            )));
        }

        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ExporterError::Fetch(format!("reading response body failed: {e}")))?
            .to_bytes();

        debug!(upstream = %self.address, bytes = body.len(), "node state fetched");
        Ok(body)
    }
}
