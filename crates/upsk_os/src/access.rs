#![forbid(unsafe_code)]

/// Exact-match password check in front of the admin views.
///
/// This is a cosmetic gate: no hashing, no lockout, no session. The secret is
/// compared in-process and the result lives only in transient view state.
/// It does not protect the stored data from anyone with access to the store.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// A gate with no configured secret denies every candidate.
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn check_admin_access(&self, candidate: &str) -> bool {
        match self.secret.as_deref() {
            Some(secret) => candidate == secret,
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}
