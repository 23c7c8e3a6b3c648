//! `POST /stream` (start or resume a run) and `GET /stream/{thread_id}`
//! (the SSE-shaped event feed, replaying the backlog then following
//! live events until completion or an interrupt).

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use fin_events::EventPayload;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use tokio_stream::StreamExt;

#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    pub thread_id: String,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub resume_payload: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct StreamStarted {
    pub thread_id: String,
    pub started_at: chrono::DateTime<Utc>,
}

/// Starts a fresh run when given `message`, or resumes a paused one when
/// given `resume_payload`. Returns as soon as the scheduler has accepted
/// the run; the actual rounds drive on a spawned task and are observed
/// through `GET /stream/{thread_id}`.
pub async fn start_or_resume(
    State(app): State<AppState>,
    Json(request): Json<StreamRequest>,
) -> ApiResult<Json<StreamStarted>> {
    match (request.message, request.resume_payload) {
        (Some(message), None) => {
            let initial = json!({"role": "user", "content": message_text(&message)?});
            app.scheduler.start(&request.thread_id, initial).await?;
        }
        (None, Some(resume_payload)) => {
            app.scheduler.resume(&request.thread_id, resume_payload).await?;
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest("exactly one of message or resume_payload is required".into()));
        }
        (None, None) => {
            return Err(ApiError::BadRequest("exactly one of message or resume_payload is required".into()));
        }
    }

    Ok(Json(StreamStarted { thread_id: request.thread_id, started_at: Utc::now() }))
}

fn message_text(message: &Value) -> ApiResult<String> {
    if let Some(text) = message.as_str() {
        return Ok(text.to_string());
    }
    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest("message must be a string or {content: string}".into()))
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub after: Option<u64>,
}

/// `GET /stream/{thread_id}?after=<seq_id>` -- a live subscription to the
/// thread's event bus, replayed from `after` forward. Each line is
/// `data: <json AgentEvent>`; the scheduler's own `LifecycleStatus::Done`
/// event is translated to a terminal `data: null` so a client knows to
/// close without inspecting payload shape.
pub async fn stream_events(
    State(app): State<AppState>,
    Path(thread_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    let events = app.events.subscribe(&thread_id, query.after);

    let sse_stream = events.map(move |result| {
        let data = match result {
            Ok(event) => {
                let terminal = matches!(
                    event.payload,
                    EventPayload::LifecycleStatus { status: fin_events::LifecycleStatus::Done }
                        | EventPayload::LifecycleStatus { status: fin_events::LifecycleStatus::Error }
                );
                if terminal {
                    "null".to_string()
                } else {
                    serde_json::to_string(&event).unwrap_or_else(|_| "null".to_string())
                }
            }
            Err(error) => json!({"error_code": "SubscriberLagged", "message": error.to_string()}).to_string(),
        };
        Ok::<_, Infallible>(Event::default().data(data))
    });

    Sse::new(sse_stream).keep_alive(KeepAlive::default())
}
