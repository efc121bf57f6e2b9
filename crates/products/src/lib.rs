//! Products module: the wholesaler catalog.
//!
//! Business rules for products, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod category;
pub mod product;
pub mod stock;

pub use category::catalog_category_for_slug;
pub use product::{Product, ProductDraft, ProductForm};
pub use stock::{LOW_STOCK_THRESHOLD, StockStatus, validate_stock};
