use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult, VendorId, required};

use crate::Phone;
use crate::profile::check_password_strength;

/// A vendor (buyer) account, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    pub phone: Phone,
    pub location: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Vendor signup form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub location: String,
}

/// A signup that passed validation; the phone is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVendorSignup {
    pub name: String,
    pub email: String,
    pub phone: Phone,
    pub password: String,
    pub location: String,
}

impl NewVendor {
    pub fn validate(self) -> DomainResult<ValidVendorSignup> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        if !looks_like_email(&email) {
            return Err(DomainError::validation(format!("invalid email address: '{email}'")));
        }
        let phone = Phone::parse(&self.phone)?;
        check_password_strength(&self.password)?;

        Ok(ValidVendorSignup {
            name,
            email,
            phone,
            password: self.password,
            location: self.location.trim().to_string(),
        })
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> NewVendor {
        NewVendor {
            name: " Raj Patel ".into(),
            email: "raj@example.com".into(),
            phone: "98765 43210".into(),
            password: "vendor123".into(),
            location: "Ghatkopar".into(),
        }
    }

    #[test]
    fn valid_signup_is_normalized() {
        let valid = signup().validate().unwrap();
        assert_eq!(valid.name, "Raj Patel");
        assert_eq!(valid.phone.as_str(), "9876543210");
        assert_eq!(valid.location, "Ghatkopar");
    }

    #[test]
    fn rejects_missing_name_and_bad_email() {
        let mut s = signup();
        s.name = "  ".into();
        assert_eq!(s.validate().unwrap_err(), DomainError::validation("name is required"));

        let mut s = signup();
        s.email = "raj.example.com".into();
        assert!(matches!(s.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn rejects_short_password() {
        let mut s = signup();
        s.password = "abc".into();
        assert!(s.validate().is_err());
    }
}
