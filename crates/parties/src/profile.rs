use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult, required};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn check_password_strength(password: &str) -> DomainResult<()> {
    if password.is_empty() {
        return Err(DomainError::validation("password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Wholesaler "edit profile" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub shop_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sourcing_info: String,
}

impl ProfileUpdate {
    pub fn validate(self) -> DomainResult<ProfileUpdate> {
        Ok(ProfileUpdate {
            name: required("name", &self.name)?,
            shop_name: required("shop name", &self.shop_name)?,
            location: self.location.trim().to_string(),
            sourcing_info: self.sourcing_info.trim().to_string(),
        })
    }
}

/// Change-password request. Fields are optional so a missing one produces a
/// validation message rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// A change request whose shape is valid; the current password still has to
/// be verified against the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedPasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn validate(self) -> DomainResult<CheckedPasswordChange> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let (Some(current), Some(new), Some(confirm)) = (
            present(self.current_password),
            present(self.new_password),
            present(self.confirm_password),
        ) else {
            return Err(DomainError::validation("All password fields are required"));
        };

        if new != confirm {
            return Err(DomainError::validation("New passwords do not match"));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "New password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }

        Ok(CheckedPasswordChange {
            current_password: current,
            new_password: new,
        })
    }
}
