use thiserror::Error;
use uuid::Uuid;

use sialo_core::error::CoreError;
use sialo_export::error::ExportError;
use sialo_instruments::error::InstrumentError;
use sialo_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("no evaluation with id {0}")]
    UnknownEvaluation(Uuid),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value {value:?} for {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
}
