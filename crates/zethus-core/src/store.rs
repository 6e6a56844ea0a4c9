//! The configuration store: owns the live configuration, applies patches,
//! persists on teardown and tells an embedding page about every change.

use crate::config::{
    default_configuration, entry_key, Configuration, KEY_ENDPOINT, KEY_GLOBAL_OPTIONS, KEY_ROS,
    KEY_VISUALIZATIONS,
};
use crate::constants::{KEY_ALPHABET, KEY_LEN, STORAGE_KEY};
use crate::error::{kind_name, ConfigError, Result};
use crate::merge::{deep_merge, shallow_merge};
use crate::notify::{ConfigMessage, ConfigNotifier};
use crate::path::{set_at, OptionPath};
use crate::storage::{load_configuration, save_configuration, ConfigStorage};
use fnv::FnvHashSet;
use rand::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Startup inputs other than storage, highest priority first.
#[derive(Clone, Debug, Default)]
pub struct StartupSeed {
    /// Configuration handed in by the host page.
    pub provided: Option<Configuration>,
    /// Raw `config` URL parameter.
    pub url_config: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    Provided,
    Url,
    Storage,
    Default,
}

/// Payload of an external `SetConfig` request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigRequest {
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub replace_on_existing: bool,
}

pub struct ConfigStore<S, N> {
    configuration: Configuration,
    session: Option<String>,
    seed_source: SeedSource,
    storage: S,
    notifier: N,
    rng: StdRng,
}

impl<S: ConfigStorage, N: ConfigNotifier> ConfigStore<S, N> {
    /// Seed from the first available source and merge it over the defaults.
    pub fn new(seed: StartupSeed, session: Option<String>, storage: S, notifier: N) -> Self {
        let (source, chosen) = pick_seed(seed, &storage);
        let configuration = match Configuration::try_from(deep_merge(
            &default_configuration().into_value(),
            &chosen.into_value(),
        )) {
            Ok(c) => c,
            Err(_) => default_configuration(),
        };
        log::info!(
            "[store] seeded from {:?}; {} visualization(s), session={:?}",
            source,
            configuration.visualizations().len(),
            session
        );
        Self {
            configuration,
            session,
            seed_source: source,
            storage,
            notifier,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the key generator, e.g. with a seeded one for reproducible runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn seed_source(&self) -> SeedSource {
        self.seed_source
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Merge `patch` into the configuration. With `replace_on_existing` the
    /// patch's top-level keys replace the current ones wholesale; otherwise
    /// the patch is merged recursively.
    pub fn update_configuration(&mut self, patch: &Value, replace_on_existing: bool) -> Result<()> {
        match patch {
            Value::Object(p) => {
                self.commit(p.clone(), replace_on_existing);
                Ok(())
            }
            other => Err(ConfigError::NotAnObject(kind_name(other))),
        }
    }

    /// Handle an external `SetConfig` request. A request without a `config`
    /// changes nothing.
    pub fn apply(&mut self, request: SetConfigRequest) -> Result<()> {
        if request.config.is_null() {
            log::warn!("[store] SetConfig without a config; ignored");
            return Ok(());
        }
        self.update_configuration(&request.config, request.replace_on_existing)
    }

    /// Shallow-merge `patch` into the entry keyed `key`. Returns whether an
    /// entry matched.
    pub fn update_viz_options(&mut self, key: &str, patch: &Map<String, Value>) -> bool {
        self.map_entry(key, |entry| {
            for (k, v) in patch {
                entry.insert(k.clone(), v.clone());
            }
        })
    }

    /// Overlay `fields` on the entry's `options` object.
    pub fn update_viz_option_fields(&mut self, key: &str, fields: &Map<String, Value>) -> bool {
        let Some(current) = self.configuration.visualization(key) else {
            return false;
        };
        let options = shallow_merge(
            current.get("options").unwrap_or(&Value::Null),
            &Value::Object(fields.clone()),
        );
        let mut patch = Map::new();
        patch.insert("options".to_string(), options);
        self.update_viz_options(key, &patch)
    }

    pub fn update_ros_endpoint(&mut self, endpoint: &str) {
        let mut ros = match self.configuration.ros() {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        ros.insert(KEY_ENDPOINT.to_string(), Value::String(endpoint.to_string()));
        let mut patch = Map::new();
        patch.insert(KEY_ROS.to_string(), Value::Object(ros));
        self.commit(patch, false);
    }

    /// Store `option` at `path` inside `globalOptions` and replace the whole
    /// `globalOptions` key with the result.
    pub fn update_global_options(&mut self, path: &str, option: Value) -> Result<()> {
        let path: OptionPath = path.parse()?;
        let updated = set_at(&self.configuration.global_options(), &path, option)?;
        let mut patch = Map::new();
        patch.insert(KEY_GLOBAL_OPTIONS.to_string(), updated);
        self.commit(patch, true);
        Ok(())
    }

    /// Append a visualization under a freshly generated key and return it.
    pub fn add_visualization(&mut self, viz_options: Map<String, Value>) -> String {
        let key = {
            let existing: FnvHashSet<&str> = self
                .configuration
                .visualizations()
                .iter()
                .filter_map(entry_key)
                .collect();
            generate_key(&mut self.rng, &existing)
        };
        let mut entry = viz_options;
        entry.insert("key".to_string(), Value::String(key.clone()));
        let mut list = self.configuration.visualizations().to_vec();
        list.push(Value::Object(entry));
        let mut patch = Map::new();
        patch.insert(KEY_VISUALIZATIONS.to_string(), Value::Array(list));
        self.commit(patch, false);
        key
    }

    /// Drop the entry whose key is `target`. Unknown targets leave the list as is.
    pub fn remove_visualization(&mut self, target: &str) {
        let list: Vec<Value> = self
            .configuration
            .visualizations()
            .iter()
            .filter(|v| entry_key(v) != Some(target))
            .cloned()
            .collect();
        let mut patch = Map::new();
        patch.insert(KEY_VISUALIZATIONS.to_string(), Value::Array(list));
        self.commit(patch, true);
    }

    /// Flip `visible` on the entry keyed `target`.
    ///
    /// An absent flag means "shown", so the first toggle hides the entry:
    /// the new flag is `true` only when the old one was exactly `false`.
    pub fn toggle_visibility(&mut self, target: &str) {
        let list: Vec<Value> = self
            .configuration
            .visualizations()
            .iter()
            .map(|v| match v {
                Value::Object(m) if entry_key(v) == Some(target) => {
                    let mut m = m.clone();
                    let hidden = matches!(m.get("visible"), Some(Value::Bool(false)));
                    m.insert("visible".to_string(), Value::Bool(hidden));
                    Value::Object(m)
                }
                other => other.clone(),
            })
            .collect();
        let mut patch = Map::new();
        patch.insert(KEY_VISUALIZATIONS.to_string(), Value::Array(list));
        self.commit(patch, true);
    }

    /// Return to the built-in defaults and write them through, so the reload
    /// that follows starts clean.
    pub fn reset(&mut self) -> Result<()> {
        log::info!("[store] reset to defaults");
        self.configuration = default_configuration();
        self.persist()
    }

    /// Write the current configuration to durable storage.
    pub fn persist(&mut self) -> Result<()> {
        save_configuration(&mut self.storage, STORAGE_KEY, &self.configuration)?;
        log::info!("[store] persisted configuration under `{STORAGE_KEY}`");
        Ok(())
    }

    fn map_entry(&mut self, key: &str, f: impl FnOnce(&mut Map<String, Value>)) -> bool {
        let list = self.configuration.visualizations();
        let Some(idx) = list.iter().position(|v| entry_key(v) == Some(key)) else {
            return false;
        };
        let mut list = list.to_vec();
        if let Value::Object(entry) = &mut list[idx] {
            f(entry);
        }
        let mut patch = Map::new();
        patch.insert(KEY_VISUALIZATIONS.to_string(), Value::Array(list));
        self.commit(patch, true);
        true
    }

    fn commit(&mut self, patch: Map<String, Value>, replace_on_existing: bool) {
        let current = self.configuration.to_value();
        let patch = Value::Object(patch);
        let next = if replace_on_existing {
            shallow_merge(&current, &patch)
        } else {
            deep_merge(&current, &patch)
        };
        // Both merges of two objects yield an object.
        if let Ok(next) = Configuration::try_from(next) {
            self.configuration = next;
        }
        log::debug!(
            "[store] update replace={} keys={:?}",
            replace_on_existing,
            patch.as_object().map(|m| m.keys().collect::<Vec<_>>())
        );
        if let Some(session) = &self.session {
            self.notifier
                .notify(ConfigMessage::update(session, self.configuration.clone()));
        }
    }
}

fn pick_seed<S: ConfigStorage>(seed: StartupSeed, storage: &S) -> (SeedSource, Configuration) {
    if let Some(c) = seed.provided {
        return (SeedSource::Provided, c);
    }
    if let Some(raw) = seed.url_config.as_deref() {
        match Configuration::from_json(raw) {
            Ok(c) => return (SeedSource::Url, c),
            Err(e) => log::warn!("[store] ignoring malformed `config` parameter: {e}"),
        }
    }
    match load_configuration(storage, STORAGE_KEY) {
        Ok(Some(c)) => return (SeedSource::Storage, c),
        Ok(None) => {}
        Err(e) => log::warn!("[store] could not read stored configuration: {e}"),
    }
    (SeedSource::Default, Configuration::default())
}

/// Short URL-safe id not present in `existing`.
pub fn generate_key<R: Rng>(rng: &mut R, existing: &FnvHashSet<&str>) -> String {
    loop {
        let key: String = (0..KEY_LEN)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect();
        if !existing.contains(key.as_str()) {
            return key;
        }
    }
}
