use std::net::IpAddr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub api_token: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub max_connections: u32,
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[redacted]")
            .field("api_token", &"[redacted]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_size", &self.max_body_size)
            .field("max_connections", &self.max_connections)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_required = |key: &str| -> Result<String, String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_token = env_required("API_TOKEN")?;
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("SUBMISSION_STORE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SUBMISSION_STORE_HOST: {e}"))?;

        let port: u16 = env_or("SUBMISSION_STORE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SUBMISSION_STORE_PORT: {e}"))?;

        let max_body_size: usize = env_or("SUBMISSION_STORE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid SUBMISSION_STORE_MAX_BODY_SIZE: {e}"))?;

        let max_connections: u32 = env_or("SUBMISSION_STORE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid SUBMISSION_STORE_MAX_CONNECTIONS: {e}"))?;

        let log_level = env_or("SUBMISSION_STORE_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            api_token,
            host,
            port,
            max_body_size,
            max_connections,
            log_level,
        })
    }
}
