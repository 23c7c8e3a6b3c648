//! `GET /thread/{thread_id}`, `GET /thread/{thread_id}/agents` and
//! `GET /history/{thread_id}` -- read-only projections of a
//! `fin_graph::ThreadState` (deserialize path/query, delegate, serialize).

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use fin_graph::NodeStatus;
use serde::Deserialize;
use std::collections::HashMap;

pub async fn get_thread(
    State(app): State<AppState>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<fin_graph::ThreadState>> {
    Ok(Json(app.scheduler.state(&thread_id).await?))
}

pub async fn get_thread_agents(
    State(app): State<AppState>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<HashMap<String, NodeStatus>>> {
    let state = app.scheduler.state(&thread_id).await?;
    Ok(Json(state.node_statuses))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub before: Option<usize>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    50
}

pub async fn get_history(
    State(app): State<AppState>,
    Path(thread_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    let history = app.scheduler.history(&thread_id, query.before, query.page_size).await?;
    Ok(Json(history))
}
