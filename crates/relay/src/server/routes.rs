use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::Server;
use crate::{alerts::decode_batch, metrics, Result};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn metrics() -> Result<String> {
    metrics::gather_metrics()
}

pub async fn relay_alerts(
    State(server): State<Arc<Server>>,
    Path(ddkey): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let batch = decode_batch(&body).map_err(|e| {
        warn!("Rejected webhook for robot {}: {}", ddkey, e);
        e
    })?;
    metrics::ALERTS_RECEIVED_TOTAL.inc_by(batch.alerts.len() as u64);

    server.notifier.relay(&ddkey, &batch).await?;

    Ok(Json(json!({ "status": "ok" })))
}
