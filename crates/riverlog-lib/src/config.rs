//! Configuration management.
use std::net::SocketAddr;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Application settings.
///
/// `database_url` and `jwt_secret` have no defaults on purpose: a process
/// without them cannot serve a single request, so extraction fails and the
/// binary exits instead of limping along.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Database connection string, e.g. `sqlite:riverlog.db`
    pub database_url: String,
    /// Secret used to sign and verify identity tokens
    pub jwt_secret: String,
    /// Log level filter passed to the tracing subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_addr() -> SocketAddr {
    "127.0.0.1:8080".parse().expect("valid default bind address")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from `riverlog.toml` overlaid with `RIVERLOG_`-prefixed
    /// environment variables.
    pub fn load() -> Result<Self> {
        Self::from_figment(Figment::new().merge(Toml::file("riverlog.toml")))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let settings = figment.merge(Env::prefixed("RIVERLOG_")).extract()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RIVERLOG_DATABASE_URL", "sqlite::memory:");
            jail.set_env("RIVERLOG_JWT_SECRET", "test-secret");

            let settings = Settings::from_figment(Figment::new()).expect("settings load");
            assert_eq!(settings.database_url, "sqlite::memory:");
            assert_eq!(settings.jwt_secret, "test-secret");
            assert_eq!(settings.bind_addr, "127.0.0.1:8080".parse().unwrap());
            assert_eq!(settings.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_missing_jwt_secret_is_fatal() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RIVERLOG_DATABASE_URL", "sqlite::memory:");

            assert!(Settings::from_figment(Figment::new()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RIVERLOG_JWT_SECRET", "test-secret");

            assert!(Settings::from_figment(Figment::new()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overridden_by_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "riverlog.toml",
                r#"
                database_url = "sqlite:file.db"
                jwt_secret = "file-secret"
                log_level = "debug"
                "#,
            )?;
            jail.set_env("RIVERLOG_JWT_SECRET", "env-secret");

            let figment = Figment::new().merge(Toml::file("riverlog.toml"));
            let settings = Settings::from_figment(figment).expect("settings load");
            assert_eq!(settings.database_url, "sqlite:file.db");
            assert_eq!(settings.jwt_secret, "env-secret");
            assert_eq!(settings.log_level, "debug");
            Ok(())
        });
    }
}
