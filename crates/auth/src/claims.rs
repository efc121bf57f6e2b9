use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vendorclub_core::{VendorId, WholesalerId};

use crate::Role;

/// A logged-in account inside a session: its id plus the display name shown
/// in page headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity<Id> {
    pub id: Id,
    pub name: String,
}

/// Session claims carried by the session cookie (transport-agnostic).
///
/// Each role slot is independent: logging in as a vendor does not drop an
/// existing wholesaler login, and logging out clears only one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wholesaler: Option<Identity<WholesalerId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Identity<VendorId>>,

    #[serde(default)]
    pub is_admin: bool,

    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// A session with no roles, valid for `ttl` from `now`.
    pub fn anonymous(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            wholesaler: None,
            vendor: None,
            is_admin: false,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Restart the validity window (done whenever the session is re-issued).
    pub fn renewed(mut self, now: DateTime<Utc>, ttl: Duration) -> Self {
        self.issued_at = now;
        self.expires_at = now + ttl;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Wholesaler => self.wholesaler.is_some(),
            Role::Vendor => self.vendor.is_some(),
        }
    }

    /// True when no role is present; such a session need not be stored.
    pub fn is_empty(&self) -> bool {
        !self.is_admin && self.wholesaler.is_none() && self.vendor.is_none()
    }

    pub fn wholesaler_id(&self) -> Option<WholesalerId> {
        self.wholesaler.as_ref().map(|w| w.id)
    }

    pub fn vendor_id(&self) -> Option<VendorId> {
        self.vendor.as_ref().map(|v| v.id)
    }

    pub fn sign_in_wholesaler(&mut self, id: WholesalerId, name: impl Into<String>) {
        self.wholesaler = Some(Identity { id, name: name.into() });
    }

    pub fn sign_in_vendor(&mut self, id: VendorId, name: impl Into<String>) {
        self.vendor = Some(Identity { id, name: name.into() });
    }

    pub fn sign_in_admin(&mut self) {
        self.is_admin = true;
    }

    pub fn sign_out(&mut self, role: Role) {
        match role {
            Role::Admin => self.is_admin = false,
            Role::Wholesaler => self.wholesaler = None,
            Role::Vendor => self.vendor = None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of session claims.
///
/// Signature verification happens in the codec, not here.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> SessionClaims {
        SessionClaims::anonymous(Utc::now(), Duration::minutes(10))
    }

    #[test]
    fn roles_are_independent_slots() {
        let mut claims = fresh();
        let w = WholesalerId::new();
        let v = VendorId::new();

        claims.sign_in_wholesaler(w, "Fresh Mart");
        claims.sign_in_vendor(v, "Raj");
        assert!(claims.has_role(Role::Wholesaler));
        assert!(claims.has_role(Role::Vendor));
        assert!(!claims.has_role(Role::Admin));

        claims.sign_out(Role::Vendor);
        assert_eq!(claims.wholesaler_id(), Some(w));
        assert_eq!(claims.vendor_id(), None);
        assert!(!claims.is_empty());

        claims.sign_out(Role::Wholesaler);
        assert!(claims.is_empty());
    }

    #[test]
    fn validate_rejects_expired_and_future_sessions() {
        let now = Utc::now();
        let claims = SessionClaims::anonymous(now, Duration::minutes(5));

        assert_eq!(validate_claims(&claims, now), Ok(()));
        assert_eq!(
            validate_claims(&claims, now + Duration::minutes(5)),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, now - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let now = Utc::now();
        let claims = SessionClaims::anonymous(now, Duration::minutes(-1));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn empty_role_slots_are_omitted_from_json() {
        let json = serde_json::to_value(fresh()).unwrap();
        assert!(json.get("wholesaler").is_none());
        assert!(json.get("vendor").is_none());
        assert_eq!(json["is_admin"], false);
    }
}
