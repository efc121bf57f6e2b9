//! One store per table. Every store wraps a clone of the shared pool; the
//! `pub(crate)` write helpers take a connection so several writes can share
//! one transaction.

mod analytics;
mod orders;
mod products;
mod reviews;
mod vendors;
mod wholesalers;

pub use analytics::AnalyticsStore;
pub use orders::{OrderStore, VendorOrderLine, WholesalerOrderLine};
pub use products::ProductStore;
pub use reviews::{ReviewLine, ReviewStore};
pub use vendors::VendorStore;
pub use wholesalers::{WholesalerDocuments, WholesalerStore};

pub(crate) use analytics::refresh_rollup;
pub(crate) use orders::insert_order;
pub(crate) use products::insert_product;
pub(crate) use reviews::insert_review;
pub(crate) use vendors::{approve_vendor, register_vendor};
pub(crate) use wholesalers::{approve_wholesaler, register_wholesaler};
