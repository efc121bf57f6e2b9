use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainResult, WholesalerId, required};

use crate::Phone;
use crate::profile::check_password_strength;

/// Public performance scores shown on a wholesaler's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub trust_score: f64,
    pub response_rate: f64,
    pub delivery_rate: f64,
}

impl Default for PerformanceScores {
    fn default() -> Self {
        Self {
            trust_score: 4.7,
            response_rate: 95.0,
            delivery_rate: 92.0,
        }
    }
}

/// A wholesaler (seller) account, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wholesaler {
    pub id: WholesalerId,
    pub name: String,
    pub phone: Phone,
    pub shop_name: String,
    pub sourcing_info: String,
    pub location: String,
    pub id_doc_path: Option<String>,
    pub license_doc_path: Option<String>,
    pub profile_photo: Option<String>,
    pub approved: bool,
    pub scores: PerformanceScores,
    pub created_at: DateTime<Utc>,
}

/// Wholesaler registration form (documents are handled separately as uploads).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWholesaler {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub shop_name: String,
    #[serde(default)]
    pub sourcing_info: String,
    #[serde(default)]
    pub location: String,
}

/// A registration that passed validation; the phone is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWholesalerRegistration {
    pub name: String,
    pub phone: Phone,
    pub password: String,
    pub shop_name: String,
    pub sourcing_info: String,
    pub location: String,
}

impl NewWholesaler {
    pub fn validate(self) -> DomainResult<ValidWholesalerRegistration> {
        let name = required("name", &self.name)?;
        let phone = Phone::parse(&self.phone)?;
        check_password_strength(&self.password)?;
        let shop_name = required("shop name", &self.shop_name)?;

        Ok(ValidWholesalerRegistration {
            name,
            phone,
            password: self.password,
            shop_name,
            sourcing_info: self.sourcing_info.trim().to_string(),
            location: self.location.trim().to_string(),
        })
    }
}
