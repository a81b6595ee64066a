use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("schema_version {found} is newer than this build supports ({supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("{0} is not a JSON object")]
    NotAnObject(&'static str),

    #[error("{0} bands must be ascending")]
    BandsNotAscending(&'static str),

    #[error("{field} index {index} out of range (len {len})")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
