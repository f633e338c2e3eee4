use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::auth::extractor::ApiToken;
use crate::error::AppError;
use crate::models::{Document, UpsertAck};
use crate::state::SharedState;
use crate::submission;

pub async fn upsert(
    _auth: ApiToken,
    State(state): State<SharedState>,
    WithRejection(Json(document), _): WithRejection<Json<Document>, AppError>,
) -> Result<Json<UpsertAck>, AppError> {
    let match_key = submission::upsert(&state.pool, &document).await?;
    Ok(Json(UpsertAck { ok: true, match_key }))
}

pub async fn get(
    _auth: ApiToken,
    State(state): State<SharedState>,
    Path(match_key): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = submission::lookup(&state.pool, &match_key).await?;
    Ok(Json(document))
}
