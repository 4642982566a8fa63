//! Service configuration
//!
//! Values come from built-in defaults overlaid by `VACATIONS_*` environment
//! variables, e.g. `VACATIONS_PORT=8080` or
//! `VACATIONS_CORS_ORIGINS=http://localhost:5173,https://trips.example.com`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "VACATIONS";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Comma separated list of origins allowed by CORS
    pub cors_origins: String,
    /// Directory served under `/images`
    pub uploads_dir: String,
    /// HS256 secret for identity tokens; generated at startup when unset
    pub jwt_secret: Option<String>,
    /// Identity token lifetime in seconds
    pub token_ttl_seconds: u64,
    /// Accept `x-user-id`/`x-user-role` headers from callers without a token
    pub allow_header_identity: bool,
    /// Email of the admin account created at startup
    pub admin_email: Option<String>,
    /// Password of the admin account created at startup
    pub admin_password: Option<String>,
    /// Insert the sample catalogue when the vacations table is empty
    pub seed_sample_data: bool,
}

impl AppConfig {
    /// Load configuration from defaults and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3030)?
            .set_default("cors_origins", "http://localhost:5173")?
            .set_default("uploads_dir", "uploads")?
            .set_default("token_ttl_seconds", 86_400)?
            .set_default("allow_header_identity", true)?
            .set_default("seed_sample_data", false)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Address to bind, as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured CORS origins, trimmed, empty entries dropped
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Admin bootstrap credentials, when both are configured
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}
