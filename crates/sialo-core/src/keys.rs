//! Key-value store key conventions.
//!
//! These define the canonical names under which the persisted entities live.
//! The `_v2` suffix tracks the dual-session record shape.

pub const EVALUATIONS: &str = "sialo_evaluations_v2";

pub const ACTIVE_ID: &str = "sialo_active_id_v2";

pub const CONFIG: &str = "sialo_config_v2";

pub const WIZARD_STEP: &str = "sialo_wizard_step_v2";

/// Every key owned by the application, in wipe order.
pub const ALL: [&str; 4] = [EVALUATIONS, ACTIVE_ID, CONFIG, WIZARD_STEP];
