//! Application settings loaded via OrthoConfig.
//!
//! Values come from `CIRCLE_*` environment variables, CLI flags or a config
//! file. Optional values fall back to the defaults exposed by the accessors.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::SessionOptions;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_COOKIE_SECURE: bool = true;
const DEFAULT_SESSION_ALLOW_EPHEMERAL: bool = false;
const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Server, database and session settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CIRCLE")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the in-memory adapters are used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Set the `Secure` flag on the session cookie. Defaults to on.
    pub cookie_secure: Option<bool>,
    /// Fall back to a throwaway session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Apply pending migrations before serving. Defaults to on.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Address tuple accepted by `HttpServer::bind`.
    pub fn bind_address(&self) -> (String, u16) {
        (self.host().to_owned(), self.port())
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(DEFAULT_COOKIE_SECURE)
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral
            .unwrap_or(DEFAULT_SESSION_ALLOW_EPHEMERAL)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            key_file: self.session_key_file(),
            cookie_secure: self.cookie_secure(),
            allow_ephemeral: self.session_allow_ephemeral(),
        }
    }
}
