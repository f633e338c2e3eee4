pub mod submissions;

use sqlx::PgPool;

/// Brings the schema up to date. Safe to call against an initialized database.
pub async fn init(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
