use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::{Document, Submission};

/// Inserts the document or replaces the stored one in a single statement.
pub async fn upsert(
    pool: &PgPool,
    match_key: &str,
    payload: &Document,
) -> Result<Submission, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let submission = sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions (match_key, payload)
         VALUES ($1, $2)
         ON CONFLICT (match_key) DO UPDATE SET
           payload = EXCLUDED.payload,
           updated_at = now()
         RETURNING match_key, payload, updated_at",
    )
    .bind(match_key)
    .bind(Json(payload))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(submission)
}

pub async fn find_by_key(
    pool: &PgPool,
    match_key: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let submission = sqlx::query_as::<_, Submission>(
        "SELECT match_key, payload, updated_at FROM submissions WHERE match_key = $1",
    )
    .bind(match_key)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(submission)
}
