use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult};

/// Normalized phone number; the login handle for both roles.
///
/// Spaces, dashes and parentheses are dropped; an optional leading `+` is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        let (plus, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        };

        let digits: String = rest
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if digits.is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) || !(7..=15).contains(&digits.len()) {
            return Err(DomainError::validation(format!("invalid phone number: '{trimmed}'")));
        }

        Ok(Self(format!("{plus}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Phone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators() {
        assert_eq!(Phone::parse(" 98765-43210 ").unwrap().as_str(), "9876543210");
        assert_eq!(Phone::parse("+91 (987) 654 3210").unwrap().as_str(), "+919876543210");
    }

    #[test]
    fn rejects_blank_short_and_alpha() {
        assert_eq!(Phone::parse("  ").unwrap_err(), DomainError::validation("phone is required"));
        assert!(Phone::parse("12345").is_err());
        assert!(Phone::parse("98765abc10").is_err());
        assert!(Phone::parse("++9876543210").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a normalized phone parses to itself.
            #[test]
            fn normalization_is_idempotent(raw in "[+]?[0-9 ()-]{7,20}") {
                if let Ok(phone) = Phone::parse(&raw) {
                    prop_assert_eq!(Phone::parse(phone.as_str()).unwrap(), phone);
                }
            }
        }
    }
}
