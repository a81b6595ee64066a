//! sialo-storage
//!
//! Key-value persistence for the configuration, the evaluation list, the
//! active record id and the wizard step. Values are JSON strings; the
//! backend is either in-memory or one file per key.

pub mod error;
pub mod state;
pub mod store;
