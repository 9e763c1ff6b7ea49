use crate::config::Config;
use crate::db::DbPool;
use crate::services::icon_storage::IconStorage;
use std::sync::Arc;

/// Shared handler state. Holds no category data: every request reads what it
/// needs from the database.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub icons: IconStorage,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let icons = IconStorage::new(config.icon_path.clone());
        Self {
            db,
            config: Arc::new(config),
            icons,
        }
    }
}
