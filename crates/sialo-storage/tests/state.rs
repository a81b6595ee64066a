use serde_json::json;
use sialo_core::keys;
use sialo_core::models::config::Config;
use sialo_core::models::record::EvaluationRecord;
use sialo_storage::state::{
    load_active_id, load_config, load_evaluations, load_step, save_active_id, save_config,
    save_evaluations, save_step, wipe_all,
};
use sialo_storage::store::{FileStore, KeyValueStore, MemoryStore};

#[test]
fn empty_store_yields_defaults() {
    let store = MemoryStore::new();
    let config = load_config(&store).unwrap();
    assert_eq!(config, Config::default());
    assert!(load_evaluations(&store, &config).unwrap().is_empty());
    assert_eq!(load_active_id(&store).unwrap(), None);
    assert_eq!(load_step(&store).unwrap(), 0);
}

#[test]
fn corrupt_values_are_treated_as_absent() {
    let mut store = MemoryStore::new();
    store.set(keys::CONFIG, "{not json").unwrap();
    store.set(keys::EVALUATIONS, "42").unwrap();
    store.set(keys::ACTIVE_ID, "\"not-a-uuid\"").unwrap();
    store.set(keys::WIZARD_STEP, "\"three\"").unwrap();

    let config = load_config(&store).unwrap();
    assert_eq!(config, Config::default());
    assert!(load_evaluations(&store, &config).unwrap().is_empty());
    assert_eq!(load_active_id(&store).unwrap(), None);
    assert_eq!(load_step(&store).unwrap(), 0);
}

#[test]
fn partial_config_merges_over_defaults() {
    let mut store = MemoryStore::new();
    store
        .set(keys::CONFIG, &json!({"impact_bands": {"low": 25.0}}).to_string())
        .unwrap();
    let config = load_config(&store).unwrap();
    assert_eq!(config.impact_bands.low, 25.0);
    assert_eq!(config.impact_bands.moderate, 50.0);
    assert_eq!(config.item_count(), 10);
}

#[test]
fn evaluations_round_trip_and_bad_records_are_skipped() {
    let config = Config::default();
    let mut store = MemoryStore::new();
    let mut first = EvaluationRecord::new(&config);
    first.data.patient_name = "Ana".to_string();
    let second = EvaluationRecord::new(&config);
    save_evaluations(&mut store, &[first.clone(), second.clone()]).unwrap();

    let loaded = load_evaluations(&store, &config).unwrap();
    assert_eq!(loaded, vec![first.clone(), second.clone()]);

    let mut raw: serde_json::Value =
        serde_json::from_str(&store.get(keys::EVALUATIONS).unwrap().unwrap()).unwrap();
    raw.as_array_mut().unwrap().insert(1, json!("garbage"));
    raw.as_array_mut().unwrap().push(json!({"schema_version": 99}));
    store.set(keys::EVALUATIONS, &raw.to_string()).unwrap();

    let loaded = load_evaluations(&store, &config).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, first.id);
    assert_eq!(loaded[1].id, second.id);
}

#[test]
fn legacy_records_are_upgraded_on_load() {
    let config = Config::default();
    let mut store = MemoryStore::new();
    let legacy = json!([{
        "id": "4f6c1e2a-9a55-4c1e-8f3b-2d7c9e0a1b11",
        "title": "Old evaluation",
        "created_at": "2023-01-10T12:00:00Z",
        "updated_at": "2023-01-10T12:00:00Z",
        "data": {
            "patient_name": "Luis",
            "intervals": [1, 0, 1],
            "impact_scores": [3, 4]
        }
    }]);
    store.set(keys::EVALUATIONS, &legacy.to_string()).unwrap();

    let loaded = load_evaluations(&store, &config).unwrap();
    assert_eq!(loaded.len(), 1);
    let data = &loaded[0].data;
    assert_eq!(data.activity.escape_count(), 2);
    assert_eq!(data.rest.escape_count(), 2);
    assert_eq!(data.impact_scores.len(), config.item_count());
    assert_eq!(loaded[0].schema_version, 2);
}

#[test]
fn active_id_and_step_round_trip() {
    let mut store = MemoryStore::new();
    let id = uuid::Uuid::new_v4();
    save_active_id(&mut store, Some(id)).unwrap();
    save_step(&mut store, 4).unwrap();
    assert_eq!(load_active_id(&store).unwrap(), Some(id));
    assert_eq!(load_step(&store).unwrap(), 4);

    save_active_id(&mut store, None).unwrap();
    assert_eq!(load_active_id(&store).unwrap(), None);
}

#[test]
fn wipe_removes_every_key() {
    let config = Config::default();
    let mut store = MemoryStore::new();
    save_config(&mut store, &config).unwrap();
    save_evaluations(&mut store, &[EvaluationRecord::new(&config)]).unwrap();
    save_active_id(&mut store, Some(uuid::Uuid::new_v4())).unwrap();
    save_step(&mut store, 2).unwrap();
    store.set("unrelated", "1").unwrap();

    wipe_all(&mut store).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("1"));
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let record = EvaluationRecord::new(&config);

    {
        let mut store = FileStore::new(dir.path().join("data"));
        save_evaluations(&mut store, std::slice::from_ref(&record)).unwrap();
        save_active_id(&mut store, Some(record.id)).unwrap();
    }

    let store = FileStore::new(dir.path().join("data"));
    assert_eq!(load_evaluations(&store, &config).unwrap(), vec![record.clone()]);
    assert_eq!(load_active_id(&store).unwrap(), Some(record.id));
    assert!(dir.path().join("data").join("sialo_evaluations_v2.json").exists());
    assert!(!dir.path().join("data").join("sialo_evaluations_v2.json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn file_store_writes_private_files() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(keys::CONFIG, "{}").unwrap();
    let mode = std::fs::metadata(dir.path().join("sialo_config_v2.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    assert!(store.set("../escape", "x").is_err());
    assert!(store.get("a/b").is_err());
    assert_eq!(store.get("missing").unwrap(), None);
    store.remove("missing").unwrap();
}
