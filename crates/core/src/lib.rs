//! `vendorclub-core`: domain building blocks shared by every module.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult, required};
pub use id::{OrderId, ProductId, ReviewId, VendorId, WholesalerId};
pub use money::Money;
