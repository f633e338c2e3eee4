use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use submission_store::config::Config;

pub const TEST_TOKEN: &str = "test-api-token-that-is-long-enough";

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: Option<String>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {TEST_TOKEN}")
    }

    /// PUT a document with an arbitrary (or no) Authorization header value.
    pub async fn put_with_auth(&self, authorization: Option<&str>, body: &Value) -> (Value, StatusCode) {
        let mut req = self.client.put(self.url("/api/submissions")).json(body);
        if let Some(value) = authorization {
            req = req.header("authorization", value);
        }
        let resp = req.send().await.expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// GET a document with an arbitrary (or no) Authorization header value.
    pub async fn get_with_auth(&self, authorization: Option<&str>, match_key: &str) -> (Value, StatusCode) {
        let mut req = self.client.get(self.url(&format!("/api/submissions/{match_key}")));
        if let Some(value) = authorization {
            req = req.header("authorization", value);
        }
        let resp = req.send().await.expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Authenticated upsert.
    pub async fn put_submission(&self, body: &Value) -> (Value, StatusCode) {
        self.put_with_auth(Some(&self.bearer()), body).await
    }

    /// Authenticated lookup. `match_key` must already be URL-safe.
    #[allow(dead_code)]
    pub async fn get_submission(&self, match_key: &str) -> (Value, StatusCode) {
        self.get_with_auth(Some(&self.bearer()), match_key).await
    }

    /// Rows currently stored for a key, read straight from the table.
    #[allow(dead_code)]
    pub async fn row_count(&self, match_key: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE match_key = $1")
            .bind(match_key)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    /// Stored payload for a key, read straight from the table.
    #[allow(dead_code)]
    pub async fn stored_payload(&self, match_key: &str) -> Option<Value> {
        sqlx::query_scalar("SELECT payload FROM submissions WHERE match_key = $1")
            .bind(match_key)
            .fetch_optional(&self.pool)
            .await
            .expect("payload query failed")
    }
}

fn test_config(database_url: String, max_body_size: usize) -> Config {
    Config {
        database_url,
        api_token: TEST_TOKEN.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size,
        max_connections: 5,
        log_level: "warn".to_string(),
    }
}

async fn serve(pool: PgPool, config: Config, db_name: Option<String>) -> TestApp {
    let app = submission_store::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Spawn a test app whose pool never connects. Only paths that are rejected
/// before reaching the database can be exercised.
#[allow(dead_code)]
pub async fn spawn_offline_app(max_body_size: usize) -> TestApp {
    let url = "postgres://offline@127.0.0.1:1/offline".to_string();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&url)
        .expect("Failed to build lazy pool");

    serve(pool, test_config(url, max_body_size), None).await
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("submission_store_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .test_before_acquire(true)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    submission_store::db::init(&pool)
        .await
        .expect("Failed to initialize test database");

    serve(pool, test_config(test_url, 1_048_576), Some(db_name)).await
}

/// Drop the test database after tests complete.
#[allow(dead_code)]
pub async fn cleanup(app: TestApp) {
    app.pool.close().await;

    let Some(db_name) = app.db_name else {
        return;
    };

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
