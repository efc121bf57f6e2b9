use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vendorclub_core::{DomainError, DomainResult, Money, OrderId, ProductId, VendorId, WholesalerId};

/// Order status. Any status may follow any other (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(DomainError::validation(format!(
                "invalid order status '{other}' (expected pending, processing or completed)"
            ))),
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order placed by a vendor for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub wholesaler_id: WholesalerId,
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A new `pending` order against `product_id`, billed to the product's owner.
    pub fn place(
        vendor_id: VendorId,
        wholesaler_id: WholesalerId,
        product_id: ProductId,
        priced: PricedOrder,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            wholesaler_id,
            vendor_id,
            product_id,
            quantity: priced.quantity,
            total_amount: priced.total,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    /// Calendar day (UTC) the order counts toward in daily rollups.
    pub fn rollup_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// The quantity part of an order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub quantity: i64,
}

/// Quantity plus the computed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedOrder {
    pub quantity: i64,
    pub total: Money,
}

impl OrderRequest {
    /// Parse the quantity field; a missing or blank field means 1.
    pub fn from_form(quantity: Option<&str>) -> DomainResult<Self> {
        let quantity = match quantity.map(str::trim) {
            None | Some("") => 1,
            Some(q) => q
                .parse()
                .map_err(|_| DomainError::validation(format!("invalid quantity: '{q}'")))?,
        };
        if quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self { quantity })
    }

    /// Total = unit price × quantity.
    pub fn price(self, unit_price: Money) -> DomainResult<PricedOrder> {
        let total = unit_price
            .times(self.quantity)
            .ok_or_else(|| DomainError::validation("order total is too large"))?;
        Ok(PricedOrder {
            quantity: self.quantity,
            total,
        })
    }
}
