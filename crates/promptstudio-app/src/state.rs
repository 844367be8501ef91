use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::store::{CatalogStore, ProviderContentStore, SnapshotStore};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<CatalogStore>,
    pub content: Arc<ProviderContentStore>,
    pub snapshots: Arc<SnapshotStore>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        std::fs::create_dir_all(&settings.data_dir)?;
        let catalog = CatalogStore::load(&settings.data_dir)?;
        let snapshots = SnapshotStore::new(&settings.data_dir)?;

        Ok(Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            content: Arc::new(ProviderContentStore::seeded()),
            snapshots: Arc::new(snapshots),
        })
    }
}
