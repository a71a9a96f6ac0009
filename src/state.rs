use std::sync::Arc;

use crate::config::AppConfig;
use crate::dates::{Clock, SystemClock};
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let pg = PgStore::connect(url).await?;
                pg.migrate().await?;
                Arc::new(pg) as Arc<dyn Store>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };

        Ok(Self::from_parts(store, config, Arc::new(SystemClock)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// In-memory store, test JWT settings and a clock frozen at `now`.
    #[cfg(test)]
    pub fn fake(now: time::OffsetDateTime) -> Self {
        Self::from_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(AppConfig::for_tests()),
            Arc::new(crate::dates::FixedClock(now)),
        )
    }
}
