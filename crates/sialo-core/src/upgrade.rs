//! Load-time upgrade of persisted evaluation records.
//!
//! Each step is a pure transform on the raw JSON so that a record is
//! resolved to the current shape once, at load, instead of every computation
//! branching on which fields happen to be present.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::models::config::Config;
use crate::models::evaluation::{
    AGE_MONTHS, Bounds, DAILY_FREQUENCY, DailyActivity, FREQUENCY, IMPACT_ITEM_MAX,
    INTERVAL_COUNT, REEVALUATION_WEEKS, SEVERITY,
};
use crate::models::record::{CURRENT_SCHEMA_VERSION, EvaluationRecord};

/// Legacy single-session keys that lived directly under `data`.
const LEGACY_INTERVALS: &str = "intervals";
const LEGACY_CONDITIONS: &str = "conditions";
const LEGACY_PATTERN: &str = "pattern";

const SESSIONS: [&str; 2] = ["activity", "rest"];

/// Upgrade, deserialize and reconcile one stored record.
pub fn load_record(value: Value, config: &Config) -> Result<EvaluationRecord, CoreError> {
    let upgraded = upgrade_record(value)?;
    let mut record: EvaluationRecord = serde_json::from_value(upgraded)?;
    record.data.reconcile(config);
    Ok(record)
}

/// Run sequential upgrades from the stored `schema_version` up to
/// [`CURRENT_SCHEMA_VERSION`], then normalise ranges.
pub fn upgrade_record(mut json: Value) -> Result<Value, CoreError> {
    let from_version = json
        .get("schema_version")
        .and_then(|v| v.as_u64())
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));

    if from_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::UnsupportedSchemaVersion {
            found: from_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    let record = json
        .as_object_mut()
        .ok_or(CoreError::NotAnObject("evaluation record"))?;
    let data = record
        .entry("data")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or(CoreError::NotAnObject("evaluation data"))?;

    // v0/v1 → v2: single DQ5 session becomes the activity and rest sessions
    if from_version < 2 {
        split_legacy_session(data);
        tracing::info!(from = from_version, "upgraded evaluation record to dual DQ5 sessions");
    }

    normalize_ranges(data);
    record.insert(
        "schema_version".to_string(),
        Value::Number(CURRENT_SCHEMA_VERSION.into()),
    );
    Ok(json)
}

/// Copy the legacy session into whichever dual session is missing. Both
/// sessions then hold the same observation, so their average equals the
/// legacy single-session percentage.
fn split_legacy_session(data: &mut Map<String, Value>) {
    let intervals = data.remove(LEGACY_INTERVALS);
    let conditions = data.remove(LEGACY_CONDITIONS);
    let pattern = data.remove(LEGACY_PATTERN);

    let mut legacy = Map::new();
    if let Some(v) = intervals {
        legacy.insert("intervals".to_string(), v);
    }
    if let Some(v) = conditions {
        legacy.insert("conditions".to_string(), v);
    }
    if let Some(v) = pattern {
        legacy.insert("pattern".to_string(), v);
    }

    for key in SESSIONS {
        if !data.get(key).is_some_and(Value::is_object) {
            data.insert(key.to_string(), Value::Object(legacy.clone()));
        }
    }
}

fn normalize_ranges(data: &mut Map<String, Value>) {
    for key in SESSIONS {
        if let Some(session) = data.get_mut(key).and_then(Value::as_object_mut) {
            let slots = session
                .get("intervals")
                .map(normalize_intervals)
                .unwrap_or_else(|| vec![Value::from(0u8); INTERVAL_COUNT]);
            session.insert("intervals".to_string(), Value::Array(slots));
        }
    }

    clamp_number(data, "severity", SEVERITY);
    clamp_number(data, "frequency", FREQUENCY);
    if data.get("age_months").is_some_and(|v| !v.is_null()) {
        clamp_number(data, "age_months", AGE_MONTHS);
    }

    if let Some(scores) = data.get_mut("daily_frequency").and_then(Value::as_object_mut) {
        for activity in DailyActivity::ALL {
            if scores.contains_key(activity.id()) {
                clamp_number(scores, activity.id(), DAILY_FREQUENCY);
            }
        }
    }

    if let Some(plan) = data.get_mut("plan").and_then(Value::as_object_mut)
        && plan.contains_key("reevaluation_weeks")
    {
        clamp_number(plan, "reevaluation_weeks", REEVALUATION_WEEKS);
    }

    // Exact clamping against the configured scale happens in `reconcile`.
    let item_bounds = Bounds::new(0, IMPACT_ITEM_MAX);
    if let Some(scores) = data.get_mut("impact_scores").and_then(Value::as_array_mut) {
        for score in scores.iter_mut() {
            *score = Value::from(item_bounds.clamp(score.as_f64().unwrap_or(f64::NAN)));
        }
    }
}

/// Pad or truncate to 20 slots; anything other than 1 becomes 0.
fn normalize_intervals(value: &Value) -> Vec<Value> {
    let mut slots: Vec<Value> = value
        .as_array()
        .map(|arr| {
            arr.iter()
                .take(INTERVAL_COUNT)
                .map(|v| {
                    let escaped = v.as_f64() == Some(1.0) || v.as_bool() == Some(true);
                    Value::from(u8::from(escaped))
                })
                .collect()
        })
        .unwrap_or_default();
    slots.resize(INTERVAL_COUNT, Value::from(0u8));
    slots
}

/// Missing or non-numeric values fall to the lower bound.
fn clamp_number(obj: &mut Map<String, Value>, key: &str, bounds: Bounds) {
    let raw = obj
        .get(key)
        .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())))
        .unwrap_or(f64::NAN);
    obj.insert(key.to_string(), Value::from(bounds.clamp(raw)));
}
