use serde::{Deserialize, Serialize};

/// Marketplace role a session can carry.
///
/// A single browser session may hold several roles at once (an admin who is
/// also logged in as a wholesaler, for instance).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Wholesaler,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Wholesaler => "wholesaler",
            Role::Vendor => "vendor",
        }
    }

    /// Login page unauthenticated page requests are sent to.
    pub fn login_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/login",
            Role::Wholesaler => "/wholesaler/login",
            Role::Vendor => "/vendor/login",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
