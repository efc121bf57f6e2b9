use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult};

/// Stock counts below this (and above zero) are "Low Stock".
pub const LOW_STOCK_THRESHOLD: i64 = 50;

/// Stock-status label derived from the stock count.
///
/// Never set directly: always recomputed from the count on every stock write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn from_stock(stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "In Stock" => Some(StockStatus::InStock),
            "Low Stock" => Some(StockStatus::LowStock),
            "Out of Stock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stock counts are whole, non-negative numbers.
pub fn validate_stock(stock: i64) -> DomainResult<i64> {
    if stock < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    Ok(stock)
}
