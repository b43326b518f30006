#![forbid(unsafe_code)]

pub mod access;
pub mod config;
pub mod generation_slot;
pub mod logo_asset;
pub mod portal;
pub mod view_state;

pub use access::AdminGate;
pub use generation_slot::{GenerationSlot, GenerationTicket};
pub use portal::{PendingGeneration, Portal, PortalError};
pub use view_state::ViewState;
