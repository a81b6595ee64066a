//! sialo-core
//!
//! Pure domain types for the sialorrhea assessment: configuration, evaluation
//! records, scalar field edits and the load-time schema upgrade.
//! No scoring here; this is the shared vocabulary of the Sialo system.

pub mod edit;
pub mod error;
pub mod keys;
pub mod models;
pub mod upgrade;
