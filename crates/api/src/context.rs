use serde::{Deserialize, Serialize};

use vendorclub_auth::SessionClaims;

/// Session for a request, decoded from the session cookie.
///
/// Always present on routed requests; an absent or invalid cookie yields an
/// empty (anonymous) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    claims: SessionClaims,
}

impl Session {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn into_claims(self) -> SessionClaims {
        self.claims
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
    Warning,
    Info,
}

/// One-shot message shown on the next page a browser loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { category: FlashCategory::Warning, message: message.into() }
    }
}

/// Flash messages carried in by the request's flash cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFlashes(pub Vec<FlashMessage>);

impl PendingFlashes {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
