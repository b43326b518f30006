#![forbid(unsafe_code)]

pub mod gateway;
pub mod provider;

pub use gateway::TextGenerationGateway;
pub use provider::{GeminiProvider, GenerationProvider, GenerationProviderConfig, ProviderCallError};
