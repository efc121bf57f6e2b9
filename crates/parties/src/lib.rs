//! Parties module: vendors (buyers) and wholesalers (sellers).
//!
//! Registration, approval, login and profile rules, implemented as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod login;
pub mod phone;
pub mod profile;
pub mod vendor;
pub mod wholesaler;

pub use login::{LoginAccount, LoginError, evaluate_login};
pub use phone::Phone;
pub use profile::{CheckedPasswordChange, MIN_PASSWORD_LEN, PasswordChange, ProfileUpdate};
pub use vendor::{NewVendor, ValidVendorSignup, Vendor};
pub use wholesaler::{NewWholesaler, PerformanceScores, ValidWholesalerRegistration, Wholesaler};
