#![forbid(unsafe_code)]

pub mod common;
pub mod directory;
pub mod generation;
pub mod logo;
pub mod resources;

pub use common::{ContractViolation, Validate};
