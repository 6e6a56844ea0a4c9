// Host-side tests for the configuration store.

use rand::prelude::*;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use zethus_core::*;

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

fn make_store(storage: MemoryStorage) -> ConfigStore<MemoryStorage, NullNotifier> {
    ConfigStore::new(StartupSeed::default(), None, storage, NullNotifier)
        .with_rng(StdRng::seed_from_u64(7))
}

fn keys(config: &Configuration) -> Vec<String> {
    config
        .visualizations()
        .iter()
        .filter_map(entry_key)
        .map(str::to_string)
        .collect()
}

#[test]
fn seeds_from_defaults_when_nothing_else_is_present() {
    let store = make_store(MemoryStorage::new());
    assert_eq!(store.seed_source(), SeedSource::Default);
    assert_eq!(store.configuration(), &default_configuration());
    assert_eq!(store.configuration().ros_endpoint(), Some(DEFAULT_ROS_ENDPOINT));
}

#[test]
fn seed_priority_is_provided_then_url_then_storage() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(STORAGE_KEY, r#"{"ros":{"endpoint":"ws://stored:9090"}}"#)
        .unwrap();

    let url = Some(r#"{"ros":{"endpoint":"ws://url:9090"}}"#.to_string());
    let provided = Configuration::from_value(json!({ "ros": { "endpoint": "ws://given:9090" } })).ok();

    let s = ConfigStore::new(
        StartupSeed {
            provided: provided.clone(),
            url_config: url.clone(),
        },
        None,
        storage.clone(),
        NullNotifier,
    );
    assert_eq!(s.seed_source(), SeedSource::Provided);
    assert_eq!(s.configuration().ros_endpoint(), Some("ws://given:9090"));

    let s = ConfigStore::new(
        StartupSeed {
            provided: None,
            url_config: url,
        },
        None,
        storage.clone(),
        NullNotifier,
    );
    assert_eq!(s.seed_source(), SeedSource::Url);
    assert_eq!(s.configuration().ros_endpoint(), Some("ws://url:9090"));

    let s = ConfigStore::new(StartupSeed::default(), None, storage, NullNotifier);
    assert_eq!(s.seed_source(), SeedSource::Storage);
    assert_eq!(s.configuration().ros_endpoint(), Some("ws://stored:9090"));
    // merged over the defaults
    assert_eq!(s.configuration().global_options(), default_configuration().global_options());
}

#[test]
fn malformed_url_config_falls_back_to_storage() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(STORAGE_KEY, r#"{"ros":{"endpoint":"ws://stored:9090"}}"#)
        .unwrap();
    let s = ConfigStore::new(
        StartupSeed {
            provided: None,
            url_config: Some("{not json".to_string()),
        },
        None,
        storage,
        NullNotifier,
    );
    assert_eq!(s.seed_source(), SeedSource::Storage);
}

#[test]
fn corrupt_storage_is_ignored() {
    let mut storage = MemoryStorage::new();
    storage.set_item(STORAGE_KEY, "[1, 2").unwrap();
    let s = make_store(storage);
    assert_eq!(s.seed_source(), SeedSource::Default);
}

#[test]
fn deep_update_merges_recursively() {
    let mut s = make_store(MemoryStorage::new());
    let before = s.configuration().to_value();
    let patch = json!({ "globalOptions": { "grid": { "size": 5 } }, "extra": { "x": 1 } });
    s.update_configuration(&patch, false).unwrap();
    assert_eq!(s.configuration().to_value(), merge::deep_merge(&before, &patch));
    assert_eq!(s.configuration().global_options()["grid"]["divisions"], 30);
    assert_eq!(s.configuration().global_options()["grid"]["size"], 5);
}

#[test]
fn replace_update_overwrites_top_level_keys() {
    let mut s = make_store(MemoryStorage::new());
    let before = s.configuration().clone();
    s.update_configuration(&json!({ "globalOptions": { "grid": { "size": 5 } } }), true)
        .unwrap();
    let after = s.configuration();
    assert_eq!(after.global_options(), json!({ "grid": { "size": 5 } }));
    for (k, v) in before.as_map() {
        if k != KEY_GLOBAL_OPTIONS {
            assert_eq!(after.get(k), Some(v), "key {k} changed");
        }
    }
    assert_eq!(after.as_map().len(), before.as_map().len());
}

#[test]
fn update_rejects_non_object_patch() {
    let mut s = make_store(MemoryStorage::new());
    assert!(s.update_configuration(&json!([1]), false).is_err());
    assert_eq!(s.configuration(), &default_configuration());
}

#[test]
fn add_visualization_appends_with_fresh_key() {
    let mut s = make_store(MemoryStorage::new());
    let key = s.add_visualization(obj(json!({
        "type": "Path",
        "options": { "color": "#fff", "alpha": 1 }
    })));
    let list = s.configuration().visualizations();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["type"], "Path");
    assert_eq!(entry_key(&list[0]), Some(key.as_str()));
    assert_eq!(key.len(), KEY_LEN);

    for _ in 0..20 {
        let prior = keys(s.configuration());
        let n = prior.len();
        let k = s.add_visualization(obj(json!({ "type": "Path" })));
        assert_eq!(s.configuration().visualizations().len(), n + 1);
        assert!(!prior.contains(&k));
    }
}

#[test]
fn typed_entry_round_trips_through_add() {
    let mut s = make_store(MemoryStorage::new());
    let entry = VisualizationEntry::new("Path").with_option("alpha", json!(0.5));
    let key = s.add_visualization(obj(entry.to_value().unwrap()));
    let stored = VisualizationEntry::from_value(s.configuration().visualization(&key).unwrap()).unwrap();
    assert_eq!(stored.key, key);
    assert_eq!(stored.viz_type, "Path");
    assert_eq!(stored.options["alpha"], 0.5);
    assert_eq!(stored.visible, None);
}

#[test]
fn generate_key_skips_existing() {
    let mut rng = StdRng::seed_from_u64(1);
    let first = generate_key(&mut rng.clone(), &Default::default());
    let mut taken = fnv::FnvHashSet::default();
    taken.insert(first.as_str());
    let second = generate_key(&mut rng, &taken);
    assert_ne!(first, second);
    assert!(second.bytes().all(|b| KEY_ALPHABET.contains(&b)));
}

#[test]
fn remove_visualization_filters_and_ignores_unknown() {
    let mut s = make_store(MemoryStorage::new());
    let a = s.add_visualization(obj(json!({ "type": "Path" })));
    let b = s.add_visualization(obj(json!({ "type": "Marker" })));

    let before = s.configuration().clone();
    s.remove_visualization("no-such-key");
    assert_eq!(s.configuration(), &before);

    s.remove_visualization(&a);
    assert_eq!(keys(s.configuration()), vec![b]);
}

#[test]
fn toggle_visibility_hides_first_then_shows() {
    let mut s = make_store(MemoryStorage::new());
    let key = s.add_visualization(obj(json!({ "type": "Path" })));
    assert!(is_visible(s.configuration().visualization(&key).unwrap()));

    s.toggle_visibility(&key);
    let entry = s.configuration().visualization(&key).unwrap();
    assert_eq!(entry["visible"], false);
    assert!(!is_visible(entry));

    s.toggle_visibility(&key);
    assert_eq!(s.configuration().visualization(&key).unwrap()["visible"], true);

    s.toggle_visibility(&key);
    assert_eq!(s.configuration().visualization(&key).unwrap()["visible"], false);
}

#[test]
fn toggle_visibility_non_boolean_flag_becomes_false() {
    let mut s = make_store(MemoryStorage::new());
    let key = s.add_visualization(obj(json!({ "type": "Path", "visible": "yes" })));
    s.toggle_visibility(&key);
    assert_eq!(s.configuration().visualization(&key).unwrap()["visible"], false);
}

#[test]
fn update_viz_options_touches_only_the_matching_entry() {
    let mut s = make_store(MemoryStorage::new());
    let a = s.add_visualization(obj(json!({ "type": "Path", "options": { "alpha": 1 } })));
    let b = s.add_visualization(obj(json!({ "type": "Path", "options": { "alpha": 1 } })));

    assert!(s.update_viz_options(&a, &obj(json!({ "options": { "color": "#00ff00" } }))));
    let cfg = s.configuration();
    assert_eq!(cfg.visualization(&a).unwrap()["options"], json!({ "color": "#00ff00" }));
    assert_eq!(cfg.visualization(&b).unwrap()["options"], json!({ "alpha": 1 }));

    let before = s.configuration().clone();
    assert!(!s.update_viz_options("missing", &obj(json!({ "options": {} }))));
    assert_eq!(s.configuration(), &before);
}

#[test]
fn update_viz_option_fields_keeps_sibling_options() {
    let mut s = make_store(MemoryStorage::new());
    let key = s.add_visualization(obj(json!({ "type": "Path", "options": { "alpha": 1 } })));
    assert!(s.update_viz_option_fields(&key, &obj(json!({ "color": "#123456" }))));
    assert_eq!(
        s.configuration().visualization(&key).unwrap()["options"],
        json!({ "alpha": 1, "color": "#123456" })
    );
}

#[test]
fn update_ros_endpoint_keeps_other_ros_fields() {
    let mut s = make_store(MemoryStorage::new());
    s.update_configuration(&json!({ "ros": { "user": "bot" } }), false).unwrap();
    s.update_ros_endpoint("ws://robot:9090");
    assert_eq!(
        s.configuration().ros(),
        json!({ "endpoint": "ws://robot:9090", "user": "bot" })
    );
}

#[test]
fn update_global_options_sets_path_and_replaces_subtree() {
    let mut s = make_store(MemoryStorage::new());
    s.update_global_options("grid.color", json!("#ff0000")).unwrap();
    let g = s.configuration().global_options();
    assert_eq!(g["grid"]["color"], "#ff0000");
    assert_eq!(g["grid"]["size"], 30);
    assert_eq!(g["fixedFrame"]["value"], "world");

    assert!(s.update_global_options("grid..color", json!(1)).is_err());
}

#[test]
fn notifies_only_with_a_session() {
    let (notifier, rx) = ChannelNotifier::channel();
    let mut s = ConfigStore::new(StartupSeed::default(), Some("abc".into()), MemoryStorage::new(), notifier);
    s.update_ros_endpoint("ws://x:9090");
    let msg = rx.try_recv().expect("message sent");
    assert_eq!(msg.kind, MessageKind::UpdateConfig);
    assert_eq!(msg.session, "abc");
    assert_eq!(msg.payload.ros_endpoint(), Some("ws://x:9090"));
    assert_eq!(update_config_event_name(&msg.session), "ZethusUpdateConfigabc");

    let (notifier, rx) = ChannelNotifier::channel();
    let mut s = ConfigStore::new(StartupSeed::default(), None, MemoryStorage::new(), notifier);
    s.update_ros_endpoint("ws://x:9090");
    assert!(rx.try_recv().is_err());
}

#[test]
fn set_config_request_decodes_and_applies() {
    let req: SetConfigRequest = serde_json::from_value(json!({
        "config": { "ros": { "endpoint": "ws://ext:9090" } },
        "replaceOnExisting": true
    }))
    .unwrap();
    assert!(req.replace_on_existing);

    let mut s = make_store(MemoryStorage::new());
    s.apply(req).unwrap();
    assert_eq!(s.configuration().ros(), json!({ "endpoint": "ws://ext:9090" }));

    let defaulted: SetConfigRequest =
        serde_json::from_value(json!({ "config": { "a": 1 } })).unwrap();
    assert!(!defaulted.replace_on_existing);
}

#[test]
fn persist_then_reload_reproduces_configuration() {
    let storage = MemoryStorage::new();
    let mut s = make_store(storage.clone());
    s.add_visualization(obj(json!({ "type": "Path", "options": { "color": "#abcdef" } })));
    s.update_global_options("axes.size", json!(3)).unwrap();
    s.persist().unwrap();
    assert_eq!(storage.len(), 1);

    let reloaded = make_store(storage);
    assert_eq!(reloaded.seed_source(), SeedSource::Storage);
    assert_eq!(reloaded.configuration(), s.configuration());
}

#[test]
fn reset_restores_and_persists_defaults() {
    let storage = MemoryStorage::new();
    let mut s = make_store(storage.clone());
    s.add_visualization(obj(json!({ "type": "Path" })));
    s.reset().unwrap();
    assert_eq!(s.configuration(), &default_configuration());
    let stored = load_configuration(&storage, STORAGE_KEY).unwrap().unwrap();
    assert_eq!(stored, default_configuration());
}

#[test]
fn set_config_without_config_changes_nothing() {
    let (notifier, rx) = ChannelNotifier::channel();
    let mut s = ConfigStore::new(StartupSeed::default(), Some("abc".into()), MemoryStorage::new(), notifier);
    let before = s.configuration().clone();
    let req: SetConfigRequest = serde_json::from_value(json!({ "isTrusted": true })).unwrap();
    s.apply(req).unwrap();
    assert_eq!(s.configuration(), &before);
    assert!(rx.try_recv().is_err());
}

type SharedStore = Rc<RefCell<ConfigStore<MemoryStorage, DeferredNotifier<ReadBack>>>>;

/// Listener that reads the store back and answers the first change with a
/// follow-up update, the way an embedding page reacting to a change would.
struct ReadBack {
    store: Rc<RefCell<Option<SharedStore>>>,
    seen: Rc<RefCell<Vec<String>>>,
}

impl ConfigNotifier for ReadBack {
    fn notify(&self, message: ConfigMessage) {
        let Some(store) = self.store.borrow().clone() else {
            return;
        };
        let endpoint = store
            .borrow()
            .configuration()
            .ros_endpoint()
            .unwrap_or_default()
            .to_string();
        assert_eq!(Some(endpoint.as_str()), message.payload.ros_endpoint());
        self.seen.borrow_mut().push(endpoint.clone());
        if endpoint == "ws://first:9090" {
            store.borrow_mut().update_ros_endpoint("ws://echo:9090");
        }
    }
}

#[test]
fn deferred_notifier_delivers_after_the_store_is_released() {
    let slot: Rc<RefCell<Option<SharedStore>>> = Rc::default();
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let deferred = DeferredNotifier::new(ReadBack {
        store: slot.clone(),
        seen: seen.clone(),
    });
    let store: SharedStore = Rc::new(RefCell::new(ConfigStore::new(
        StartupSeed::default(),
        Some("abc".into()),
        MemoryStorage::new(),
        deferred.clone(),
    )));
    *slot.borrow_mut() = Some(store.clone());

    store.borrow_mut().update_ros_endpoint("ws://first:9090");
    assert_eq!(deferred.pending(), 1);
    assert!(seen.borrow().is_empty());

    deferred.flush();
    assert_eq!(deferred.pending(), 0);
    assert_eq!(*seen.borrow(), vec!["ws://first:9090", "ws://echo:9090"]);
    assert_eq!(store.borrow().configuration().ros_endpoint(), Some("ws://echo:9090"));

    slot.borrow_mut().take();
}
