use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:5000"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL for the registrant store.
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite:data/giveaway.sqlite".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Dashboard password. For security: prefer setting env var
    /// `GIVEAWAY_ADMIN_PASSWORD`.
    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_password() -> String {
    "changeme".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
        }
    }
}

impl AdminConfig {
    /// True when the password was never changed from the built-in default.
    pub fn uses_default_password(&self) -> bool {
        self.password == default_admin_password()
    }
}

/// Load configuration from `config.toml` (or the path in `GIVEAWAY_CONFIG`),
/// falling back to defaults when no file exists, then apply env overrides:
/// `DATABASE_URL`, `GIVEAWAY_ADMIN_PASSWORD`, `PORT`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = config_path();
    let mut cfg = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        tracing::info!(path = %path.display(), "loaded configuration file");
        toml::from_str(&raw)?
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        AppConfig::default()
    };
    cfg.apply_env_overrides();
    Ok(cfg)
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("GIVEAWAY_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("config.toml")
}

impl AppConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = url;
            }
        }
        if let Ok(password) = env::var("GIVEAWAY_ADMIN_PASSWORD") {
            if !password.trim().is_empty() {
                self.admin.password = password;
            }
        }
        if let Ok(port) = env::var("PORT") {
            if port.parse::<u16>().is_ok() {
                let host = self
                    .server
                    .bind
                    .rsplit_once(':')
                    .map(|(host, _)| host)
                    .unwrap_or("0.0.0.0");
                self.server.bind = format!("{host}:{port}");
            }
        }
    }
}
