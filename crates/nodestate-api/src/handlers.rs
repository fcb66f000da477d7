//! Scrape handler.
//!
//! Every request runs one full fetch → decode → map → render cycle against
//! the upstream node.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::ApiState;

/// ANY /metrics
///
/// Upstream fetch or decode failures answer `502 Bad Gateway` with an empty
/// body and leave the gauges untouched. Encoding failures answer `500`.
pub async fn scrape_metrics(State(state): State<ApiState>) -> Response {
    let exporter = &state.exporter;

    match exporter.scrape().await {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, exporter.registry().content_type())],
            body,
        )
            .into_response(),
        Err(e) if e.is_upstream() => {
            warn!(error = %e, upstream = %exporter.client().address(), "scrape aborted");
            StatusCode::BAD_GATEWAY.into_response()
        }
        Err(e) => {
            error!(error = %e, "rendering metrics failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
