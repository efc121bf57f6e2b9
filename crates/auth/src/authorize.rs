use thiserror::Error;

use vendorclub_core::{VendorId, WholesalerId};

use crate::{Identity, Role, SessionClaims};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthorized: {0} session required")]
    MissingRole(Role),
}

impl AuthzError {
    pub fn role(&self) -> Role {
        match self {
            AuthzError::MissingRole(role) => *role,
        }
    }
}

/// Check that a session carries `role`.
///
/// - No IO
/// - No panics
/// - Presence check only; ownership of rows is enforced by scoped queries.
pub fn authorize(claims: &SessionClaims, role: Role) -> Result<(), AuthzError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(role))
    }
}

impl SessionClaims {
    pub fn require_wholesaler(&self) -> Result<&Identity<WholesalerId>, AuthzError> {
        self.wholesaler
            .as_ref()
            .ok_or(AuthzError::MissingRole(Role::Wholesaler))
    }

    pub fn require_vendor(&self) -> Result<&Identity<VendorId>, AuthzError> {
        self.vendor.as_ref().ok_or(AuthzError::MissingRole(Role::Vendor))
    }

    pub fn require_admin(&self) -> Result<(), AuthzError> {
        authorize(self, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn anonymous_session_is_rejected_for_every_role() {
        let claims = SessionClaims::anonymous(Utc::now(), Duration::minutes(1));
        for role in [Role::Admin, Role::Wholesaler, Role::Vendor] {
            assert_eq!(authorize(&claims, role), Err(AuthzError::MissingRole(role)));
        }
        assert_eq!(claims.require_vendor().unwrap_err().role(), Role::Vendor);
    }

    #[test]
    fn require_returns_the_signed_in_identity() {
        let mut claims = SessionClaims::anonymous(Utc::now(), Duration::minutes(1));
        let id = WholesalerId::new();
        claims.sign_in_wholesaler(id, "Mumbai Fresh Mart");

        let who = claims.require_wholesaler().unwrap();
        assert_eq!(who.id, id);
        assert_eq!(who.name, "Mumbai Fresh Mart");
        assert!(claims.require_admin().is_err());
    }
}
