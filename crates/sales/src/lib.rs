//! Sales module: vendor orders against wholesaler products.
//!
//! Order placement and status rules as deterministic domain logic.

pub mod order;

pub use order::{Order, OrderRequest, OrderStatus, PricedOrder};
