use std::sync::Arc;

use anyhow::{Context, Result};
use wastecal_core::{DataLayout, Mode, Store};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
}

impl AppState {
    pub fn new(layout: DataLayout, mode: Mode) -> Result<Self> {
        let data_dir = layout.data_dir().to_path_buf();
        let store = Store::open(layout, mode)
            .with_context(|| format!("Failed to load calendar data from {}", data_dir.display()))?;
        Ok(AppState::from_store(store))
    }

    pub fn from_store(store: Store) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
