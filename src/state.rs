use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<AppConfig>,
    /// Fileserver visits since start or the last reset.
    pub hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Store::open(
            &config.database_path,
            time::Duration::days(config.refresh_ttl_days),
        )
        .with_context(|| format!("open database {}", config.database_path.display()))?;
        Ok(Self::from_parts(Arc::new(store), config))
    }

    pub fn from_parts(store: Arc<Store>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            config,
            hits: Arc::new(AtomicU64::new(0)),
        }
    }

    #[cfg(test)]
    pub fn fake(dir: &tempfile::TempDir) -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            database_path: dir.path().join("database.json"),
            fileserver_root: dir.path().to_path_buf(),
            refresh_ttl_days: 60,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "chirpy".into(),
                ttl_minutes: 5,
            },
        });
        let store = Store::open(&config.database_path, time::Duration::days(60))
            .expect("open test store");
        Self::from_parts(Arc::new(store), config)
    }
}
