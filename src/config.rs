//! Application Configuration
//! Mission: Load every process-wide setting once at startup

use anyhow::{Context, Result};
use std::env;
use tracing::warn;

/// Privileged credential pair supplied out-of-band at deploy time.
///
/// A registration whose username and password both match this pair is
/// elevated to admin. This is a plaintext comparison kept for compatibility
/// with existing deployments; do not ship the defaults to production.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Process-wide configuration, built from the environment exactly once in
/// `main` and passed into components at construction time. No component
/// reads the environment on its own.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let bind_addr = format!("0.0.0.0:{}", port);

        let database_path =
            env::var("COURSES_DB_PATH").unwrap_or_else(|_| "coursehub.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using development default");
            "dev-secret-change-in-production-minimum-32-characters".to_string()
        });

        let token_ttl_hours = match env::var("JWT_EXPIRES_IN_HOURS") {
            Ok(v) => v
                .parse::<i64>()
                .context("Invalid JWT_EXPIRES_IN_HOURS value")?,
            Err(_) => 12,
        };

        let bootstrap_admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(BootstrapAdmin { username, password }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
            token_ttl_hours,
            bootstrap_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        for key in [
            "PORT",
            "COURSES_DB_PATH",
            "JWT_SECRET",
            "JWT_EXPIRES_IN_HOURS",
            "ADMIN_USERNAME",
            "ADMIN_PASSWORD",
        ] {
            std::env::remove_var(key);
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.token_ttl_hours, 12);
        assert!(config.bootstrap_admin.is_none());
    }
}
