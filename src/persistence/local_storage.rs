//! Browser LocalStorage backend (WASM only)

use super::ScoreStore;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::unavailable("LocalStorage not available"))
    }
}

impl ScoreStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::unavailable(format!("LocalStorage read of {key} failed")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::unavailable(format!("LocalStorage write of {key} failed")))
    }
}
