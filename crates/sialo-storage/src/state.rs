use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use sialo_core::keys;
use sialo_core::models::config::Config;
use sialo_core::models::record::EvaluationRecord;
use sialo_core::upgrade::load_record;

use crate::error::StorageError;
use crate::store::KeyValueStore;

/// Load and deserialize a JSON value. `Ok(None)` when the key is absent.
pub fn load_state<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value, overwriting any previous one.
pub fn save_state<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}

/// Like [`load_state`], but a value that does not parse is logged and
/// treated as absent.
fn load_tolerant<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_state(store, key) {
        Err(StorageError::Serialization(e)) => {
            tracing::warn!(key, error = %e, "discarding unreadable stored value");
            Ok(None)
        }
        other => other,
    }
}

/// Stored configuration merged over the defaults. Falls back to the
/// defaults when nothing usable is stored.
pub fn load_config(store: &impl KeyValueStore) -> Result<Config, StorageError> {
    Ok(load_tolerant::<Value>(store, keys::CONFIG)?
        .map(Config::from_stored)
        .unwrap_or_default())
}

pub fn save_config(store: &mut impl KeyValueStore, config: &Config) -> Result<(), StorageError> {
    save_state(store, keys::CONFIG, config)?;
    tracing::info!(items = config.item_count(), "config saved");
    Ok(())
}

/// Every stored evaluation, upgraded to the current shape and reconciled
/// against `config`. Records that cannot be upgraded are skipped.
pub fn load_evaluations(
    store: &impl KeyValueStore,
    config: &Config,
) -> Result<Vec<EvaluationRecord>, StorageError> {
    let Some(raw) = load_tolerant::<Value>(store, keys::EVALUATIONS)? else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = raw else {
        tracing::warn!(key = keys::EVALUATIONS, "stored evaluations are not a list; ignoring");
        return Ok(Vec::new());
    };

    let total = items.len();
    let records: Vec<EvaluationRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match load_record(item, config) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable evaluation");
                None
            }
        })
        .collect();

    tracing::debug!(loaded = records.len(), total, "evaluations loaded");
    Ok(records)
}

pub fn save_evaluations(
    store: &mut impl KeyValueStore,
    records: &[EvaluationRecord],
) -> Result<(), StorageError> {
    save_state(store, keys::EVALUATIONS, &records)
}

pub fn load_active_id(store: &impl KeyValueStore) -> Result<Option<Uuid>, StorageError> {
    load_tolerant(store, keys::ACTIVE_ID)
}

/// `None` clears the stored id.
pub fn save_active_id(store: &mut impl KeyValueStore, id: Option<Uuid>) -> Result<(), StorageError> {
    match id {
        Some(id) => save_state(store, keys::ACTIVE_ID, &id),
        None => store.remove(keys::ACTIVE_ID),
    }
}

/// Wizard step index; 0 when absent or unreadable.
pub fn load_step(store: &impl KeyValueStore) -> Result<usize, StorageError> {
    Ok(load_tolerant(store, keys::WIZARD_STEP)?.unwrap_or(0))
}

pub fn save_step(store: &mut impl KeyValueStore, step: usize) -> Result<(), StorageError> {
    save_state(store, keys::WIZARD_STEP, &step)
}

/// Remove every application key.
pub fn wipe_all(store: &mut impl KeyValueStore) -> Result<(), StorageError> {
    for key in keys::ALL {
        store.remove(key)?;
    }
    tracing::info!("all stored data wiped");
    Ok(())
}
