//! `vendorclub-auth`: session, credential and role checks.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! moves tokens in and out of cookies, the infra layer stores password hashes.

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod credentials;
pub mod password;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use claims::{Identity, SessionClaims, TokenValidationError, validate_claims};
pub use codec::{Hs256SessionCodec, SessionCodec, SessionCodecError};
pub use credentials::AdminCredentials;
pub use password::{PasswordError, hash_password, verify_password};
pub use roles::Role;
