#![forbid(unsafe_code)]

use std::env;

use tracing::warn;
use upsk_engines::GenerationProviderConfig;

use crate::AdminGate;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub admin_gate: AdminGate,
    pub generation: GenerationProviderConfig,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            admin_gate: admin_gate_from_env(env::var("UPSK_ADMIN_SECRET").ok()),
            generation: GenerationProviderConfig::from_env(),
        }
    }
}

fn admin_gate_from_env(raw: Option<String>) -> AdminGate {
    match raw.filter(|secret| !secret.is_empty()) {
        Some(secret) => AdminGate::new(secret),
        None => {
            warn!("UPSK_ADMIN_SECRET not set; admin access is disabled");
            AdminGate::disabled()
        }
    }
}
