//! `GET /api/artifacts/{artifact_id}` -- the one place a client reaches
//! past an `ArtifactReference` into the full envelope. The kind is not
//! known ahead of time here, so this delegates to
//! `ArtifactStore::load_any` rather than the kind-checked `load_envelope`
//! every in-process consumer uses.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use fin_artifacts::ArtifactEnvelope;

pub async fn get_artifact(
    State(app): State<AppState>,
    Path(artifact_id): Path<String>,
) -> ApiResult<Json<ArtifactEnvelope>> {
    Ok(Json(app.artifacts.load_any(&artifact_id).await?))
}
