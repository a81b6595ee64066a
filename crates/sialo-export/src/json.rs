use serde::{Deserialize, Serialize};
use sialo_core::models::config::Config;
use sialo_core::models::record::EvaluationRecord;

use crate::error::ExportError;

pub const APP_NAME: &str = "Sialorrhea Assessment";
pub const EXPORT_VERSION: &str = "v2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub app: String,
    pub version: String,
    pub exported_at: jiff::Timestamp,
}

/// Everything needed to restore one evaluation elsewhere: the record and
/// the configuration it was scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub meta: ExportMeta,
    pub config: Config,
    pub evaluation: EvaluationRecord,
}

impl ExportSnapshot {
    pub fn new(config: &Config, record: &EvaluationRecord) -> Self {
        Self {
            meta: ExportMeta {
                app: APP_NAME.to_string(),
                version: EXPORT_VERSION.to_string(),
                exported_at: jiff::Timestamp::now(),
            },
            config: config.clone(),
            evaluation: record.clone(),
        }
    }
}

/// Pretty-printed JSON snapshot.
pub fn export_json(config: &Config, record: &EvaluationRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportSnapshot::new(config, record))?)
}
