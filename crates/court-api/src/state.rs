//! # Application Configuration and State
//!
//! `AppConfig` is constructed once at process start (from the environment
//! in `main`, or explicitly in tests) and handed to [`AppState`] — no
//! component reads ambient globals. `AppState` owns the three stores and
//! the optional database pool; cloning it is cheap and shares the stores.

use std::sync::Arc;

use sqlx::postgres::PgPool;

use court_state::{SubmissionStore, UserStore, VoteLedger};

use crate::auth::SecretString;

/// Process-wide configuration, constructed once and passed by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the server binds.
    pub port: u16,
    /// HS256 signing secret for session tokens.
    pub jwt_secret: SecretString,
    /// Session token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Whether the metrics middleware and `/metrics` route are mounted.
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `COURT_JWT_SECRET` is required; `COURT_PORT` (default 8080),
    /// `COURT_TOKEN_TTL_MINUTES` (default 60), and
    /// `COURT_METRICS_ENABLED` (default true, anything but `"false"`)
    /// are optional.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("COURT_JWT_SECRET")
            .map(SecretString::new)
            .map_err(|_| anyhow::anyhow!("COURT_JWT_SECRET must be set"))?;
        let port = match std::env::var("COURT_PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => 8080,
        };
        let token_ttl_minutes = match std::env::var("COURT_TOKEN_TTL_MINUTES") {
            Ok(raw) => raw.parse()?,
            Err(_) => 60,
        };
        let metrics_enabled = std::env::var("COURT_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        Ok(Self { port, jwt_secret, token_ttl_minutes, metrics_enabled })
    }
}

/// Shared application state: the stores, the optional Postgres pool, and
/// the configuration.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub submissions: Arc<SubmissionStore>,
    pub votes: Arc<VoteLedger>,
    pub db_pool: Option<PgPool>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Fresh in-memory state with development defaults. Intended for
    /// tests and local development only — `main` always goes through
    /// [`AppConfig::from_env`].
    pub fn new() -> Self {
        Self::with_config(
            AppConfig {
                port: 8080,
                jwt_secret: SecretString::new("insecure-dev-secret-do-not-deploy"),
                token_ttl_minutes: 60,
                metrics_enabled: true,
            },
            None,
        )
    }

    /// State with explicit configuration and an optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            users: Arc::new(UserStore::new()),
            submissions: Arc::new(SubmissionStore::new()),
            votes: Arc::new(VoteLedger::new()),
            db_pool,
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
