//! Request bodies that have no domain counterpart.
//!
//! Ids arrive as strings and are parsed in the handlers, so an unknown or
//! malformed id gets the endpoint's own "not found" answer.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PhoneLoginForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub product_id: String,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProductRef {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub order_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveReviewRequest {
    pub wholesaler_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyReviewRequest {
    pub review_id: String,
    #[serde(default)]
    pub reply: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
