use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;

/// An arbitrary JSON object as submitted by a caller.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Submission {
    pub match_key: String,
    pub payload: Json<Document>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UpsertAck {
    pub ok: bool,
    pub match_key: String,
}
