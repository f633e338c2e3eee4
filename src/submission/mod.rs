//! Document store operations: key validation, conflict-resolving upsert and
//! point lookup with the synthetic `found` marker.

use serde_json::Value;
use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::models::Document;

pub const MATCH_KEY_FIELD: &str = "match_key";
pub const FOUND_FIELD: &str = "found";

const UNTRANSLATABLE_CHARACTER: &str = "22P05";

/// Extracts the document's key. It must be a non-empty JSON string.
pub fn match_key(document: &Document) -> Result<&str, AppError> {
    match document.get(MATCH_KEY_FIELD) {
        Some(Value::String(key)) if !key.is_empty() => Ok(key.as_str()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(AppError::BadRequest(
            "match_key is required".to_string(),
        )),
        Some(_) => Err(AppError::BadRequest(
            "match_key must be a string".to_string(),
        )),
    }
}

/// Marks a stored payload as found. The marker is never written back.
pub fn with_found(mut payload: Document) -> Document {
    payload.insert(FOUND_FIELD.to_string(), Value::Bool(true));
    payload
}

/// Stores the document under its `match_key`, replacing any previous one.
pub async fn upsert(pool: &PgPool, document: &Document) -> Result<String, AppError> {
    let key = match_key(document)?;

    let stored = db::submissions::upsert(pool, key, document)
        .await
        .map_err(reject_unstorable)?;
    tracing::debug!(
        match_key = %stored.match_key,
        updated_at = %stored.updated_at,
        "Submission stored"
    );

    Ok(stored.match_key)
}

/// JSONB cannot hold `\u0000` in strings; that is the caller's input, not a
/// backend failure.
fn reject_unstorable(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(UNTRANSLATABLE_CHARACTER) =>
        {
            AppError::BadRequest(
                "Document contains characters that cannot be stored".to_string(),
            )
        }
        _ => AppError::Database(err),
    }
}

pub async fn lookup(pool: &PgPool, match_key: &str) -> Result<Document, AppError> {
    let submission = db::submissions::find_by_key(pool, match_key)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    Ok(with_found(submission.payload.0))
}
