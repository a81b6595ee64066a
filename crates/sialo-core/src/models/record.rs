use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::config::Config;
use super::evaluation::EvaluationData;

/// Shape version written by this build. See [`crate::upgrade`].
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// One patient evaluation as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationRecord {
    #[serde(default)]
    pub schema_version: u32,
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub mode: Mode,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
    #[serde(default)]
    pub data: EvaluationData,
}

/// Wizard navigation strictness. Does not affect scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Mode {
    /// Forward only through valid steps.
    #[default]
    Guided,
    /// Free jumping between steps.
    Quick,
}

impl EvaluationRecord {
    /// A new, empty evaluation dated today.
    pub fn new(config: &Config) -> Self {
        let now = jiff::Zoned::now();
        let today = now.date().to_string();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: Uuid::new_v4(),
            title: format!("Evaluation {}", now.strftime("%Y-%m-%d %H:%M")),
            mode: Mode::default(),
            created_at: now.timestamp(),
            updated_at: now.timestamp(),
            data: EvaluationData::new(config, today),
        }
    }

    /// Deep copy under a fresh id and timestamps.
    pub fn duplicate(&self) -> Self {
        let now = jiff::Timestamp::now();
        let title = if self.title.trim().is_empty() {
            "Evaluation"
        } else {
            self.title.as_str()
        };
        Self {
            id: Uuid::new_v4(),
            title: format!("Copy · {title}"),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = jiff::Timestamp::now();
    }

    /// "name · evaluation date · last update" line for record pickers.
    pub fn list_label(&self) -> String {
        format!(
            "{} · {} · {}",
            self.data.display_name(),
            self.data.evaluation_date,
            self.updated_at.strftime("%Y-%m-%d %H:%M"),
        )
    }
}
