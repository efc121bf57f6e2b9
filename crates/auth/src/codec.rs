//! Signed session tokens (HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum SessionCodecError {
    #[error("failed to sign session: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid session token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Turns session claims into an opaque cookie value and back.
pub trait SessionCodec: Send + Sync {
    fn encode(&self, claims: &SessionClaims) -> Result<String, SessionCodecError>;
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionCodecError>;
}

/// HMAC-SHA256 signed JWT codec.
pub struct Hs256SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256SessionCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Expiry lives in our own claim fields and is checked by `validate_claims`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl SessionCodec for Hs256SessionCodec {
    fn encode(&self, claims: &SessionClaims) -> Result<String, SessionCodecError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(SessionCodecError::Encode)
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionCodecError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(SessionCodecError::Decode)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vendorclub_core::VendorId;

    #[test]
    fn signed_session_decodes_with_same_secret() {
        let codec = Hs256SessionCodec::new("s3cret");
        let now = Utc::now();
        let mut claims = SessionClaims::anonymous(now, Duration::minutes(30));
        claims.sign_in_vendor(VendorId::new(), "Priya Shah");

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token, now).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let now = Utc::now();
        let mut claims = SessionClaims::anonymous(now, Duration::minutes(30));
        claims.sign_in_admin();

        let token = Hs256SessionCodec::new("one").encode(&claims).unwrap();
        let err = Hs256SessionCodec::new("two").decode(&token, now).unwrap_err();
        assert!(matches!(err, SessionCodecError::Decode(_)));
    }

    #[test]
    fn expired_session_is_rejected() {
        let codec = Hs256SessionCodec::new("s3cret");
        let now = Utc::now();
        let claims = SessionClaims::anonymous(now, Duration::minutes(1));
        let token = codec.encode(&claims).unwrap();

        let err = codec.decode(&token, now + Duration::minutes(2)).unwrap_err();
        assert!(matches!(err, SessionCodecError::Claims(TokenValidationError::Expired)));
    }
}
