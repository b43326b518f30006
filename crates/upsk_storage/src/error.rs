#![forbid(unsafe_code)]

use thiserror::Error;
use upsk_contracts::ContractViolation;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported storage document schema_version={0}")]
    SchemaVersion(u8),
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}
