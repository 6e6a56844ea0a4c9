use web_sys as web;
use zethus_core::{ConfigError, ConfigStorage};

/// `window.localStorage` as configuration storage.
pub struct LocalStorage {
    inner: web::Storage,
}

impl LocalStorage {
    pub fn open(window: &web::Window) -> anyhow::Result<Self> {
        let inner = window
            .local_storage()
            .map_err(|e| anyhow::anyhow!("localStorage: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("localStorage unavailable"))?;
        Ok(Self { inner })
    }
}

impl ConfigStorage for LocalStorage {
    fn get_item(&self, key: &str) -> zethus_core::Result<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> zethus_core::Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))
    }
}
