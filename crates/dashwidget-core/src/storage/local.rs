//! Browser `localStorage` implementation for WebAssembly.

use super::{Store, StoreError, StoreResult};

/// `localStorage`-backed store.
///
/// Note: This is intentionally not Send/Sync since WASM is single-threaded
/// and the `Storage` handle is a JS object.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's `localStorage`.
    pub fn new() -> StoreResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Other("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StoreError::Other("localStorage not available".to_string()))?;

        Ok(Self { storage })
    }
}

impl Store for LocalStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::read(key, format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        // Throws QuotaExceededError when the origin is full
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::write(key, format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::write(key, format!("{:?}", e)))
    }
}
