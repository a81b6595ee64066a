//! sialo-app
//!
//! Session handling for the `sialo` command: the evaluation in focus, the
//! wizard position, the DQ5 observation timer, the demo record and the
//! closing review. Integration tests drive [`session::Session`] over an
//! in-memory store.

pub mod demo;
pub mod error;
pub mod fields;
pub mod logging;
pub mod observe;
pub mod review;
pub mod session;
pub mod timer;

use std::path::PathBuf;

/// Platform data directory for the file store, e.g.
/// `~/.local/share/com.sialo.app` on Linux.
pub fn default_data_dir() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("com.sialo.app"))
}
