use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub fileserver_root: PathBuf,
    pub refresh_ttl_days: i64,
    pub jwt: JwtConfig,
}

/// Longest accepted refresh token lifetime.
pub const MAX_REFRESH_TTL_DAYS: i64 = 36_500;
/// Longest accepted access token lifetime (one year).
pub const MAX_JWT_TTL_MINUTES: i64 = 525_600;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "chirpy".into()),
            ttl_minutes: env_i64("JWT_TTL_MINUTES").unwrap_or(60),
        };
        let config = Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./database.json".into())
                .into(),
            fileserver_root: std::env::var("FILESERVER_ROOT")
                .unwrap_or_else(|_| ".".into())
                .into(),
            refresh_ttl_days: env_i64("REFRESH_TTL_DAYS").unwrap_or(60),
            jwt,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_REFRESH_TTL_DAYS).contains(&self.refresh_ttl_days),
            "REFRESH_TTL_DAYS must be between 1 and {MAX_REFRESH_TTL_DAYS}, got {}",
            self.refresh_ttl_days
        );
        anyhow::ensure!(
            (1..=MAX_JWT_TTL_MINUTES).contains(&self.jwt.ttl_minutes),
            "JWT_TTL_MINUTES must be between 1 and {MAX_JWT_TTL_MINUTES}, got {}",
            self.jwt.ttl_minutes
        );
        Ok(())
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse::<i64>().ok())
}
