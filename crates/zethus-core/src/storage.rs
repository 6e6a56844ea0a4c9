//! Durable key-value storage for the last-known configuration.

use crate::config::Configuration;
use crate::error::Result;
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// String slots keyed by name, like `window.localStorage`.
pub trait ConfigStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Decode the configuration stored under `key`.
///
/// A slot holding malformed JSON is reported as absent so a corrupt entry
/// can never block startup.
pub fn load_configuration(storage: &dyn ConfigStorage, key: &str) -> Result<Option<Configuration>> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    match Configuration::from_json(&raw) {
        Ok(c) => Ok(Some(c)),
        Err(e) => {
            log::warn!("[storage] ignoring unreadable `{key}`: {e}");
            Ok(None)
        }
    }
}

pub fn save_configuration(storage: &mut dyn ConfigStorage, key: &str, config: &Configuration) -> Result<()> {
    storage.set_item(key, &config.to_json()?)
}

/// In-memory storage. Clones share the same slots, which lets a test keep a
/// handle while the store owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<FnvHashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl ConfigStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: ConfigStorage + ?Sized> ConfigStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}
