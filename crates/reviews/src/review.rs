use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult, ReviewId, VendorId, WholesalerId};

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        value.value()
    }
}

/// A wholesaler's reply text, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply(String);

impl Reply {
    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("reply is required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A vendor's review of a wholesaler, as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub wholesaler_id: WholesalerId,
    pub rating: Rating,
    pub comment: String,
}

impl ReviewDraft {
    pub fn new(wholesaler_id: WholesalerId, rating: i64, comment: &str) -> DomainResult<Self> {
        Ok(Self {
            wholesaler_id,
            rating: Rating::new(rating)?,
            comment: comment.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub wholesaler_id: WholesalerId,
    pub vendor_id: VendorId,
    pub rating: Rating,
    pub comment: String,
    pub reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn write(vendor_id: VendorId, draft: ReviewDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ReviewId::new(),
            wholesaler_id: draft.wholesaler_id,
            vendor_id,
            rating: draft.rating,
            comment: draft.comment,
            reply: None,
            created_at,
        }
    }

    /// Set (or overwrite) the reply. Only the reviewed wholesaler may reply.
    pub fn reply(&mut self, by: WholesalerId, reply: Reply) -> DomainResult<()> {
        if self.wholesaler_id != by {
            return Err(DomainError::NotFound);
        }
        self.reply = Some(reply.into_inner());
        Ok(())
    }
}
