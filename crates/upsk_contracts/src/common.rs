#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    #[error("unknown variant for {field}: {got}")]
    UnknownVariant { field: &'static str, got: String },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}
