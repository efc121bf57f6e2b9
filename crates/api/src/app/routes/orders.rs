//! Ordering: vendors place orders, wholesalers move them through their
//! statuses. Every write refreshes the wholesaler's rollup for the order's
//! day in the same transaction.

use axum::{
    Extension, Form, Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, header},
    response::Response,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

use vendorclub_core::{OrderId, ProductId};
use vendorclub_sales::{Order, OrderRequest, OrderStatus};

use crate::app::AppState;
use crate::app::cookies::flash_redirect;
use crate::app::dto::{PlaceOrderForm, UpdateOrderStatusRequest};
use crate::app::errors::{ApiError, PageError};
use crate::app::pages::page;
use crate::context::{FlashMessage, PendingFlashes, Session};

const VENDOR_DASHBOARD_PATH: &str = "/vendor/dashboard";
const DASHBOARD_ORDERS: i64 = 5;

/// Local path of the Referer header, if it has one.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let path = match referer.split_once("://") {
        Some((_, rest)) => &rest[rest.find('/')?..],
        None => referer,
    };
    (path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}

pub async fn place_order(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Response, PageError> {
    let vendor_id = session.claims().require_vendor()?.id;
    let back = referer_path(&headers).unwrap_or_else(|| VENDOR_DASHBOARD_PATH.to_string());
    let not_found = || PageError::flash_error(back.clone(), "Product not found!");

    let product_id: ProductId = form.product_id.parse().map_err(|_| not_found())?;
    let product = state.db.products().find(product_id).await?.ok_or_else(not_found)?;

    let priced = OrderRequest::from_form(form.quantity.as_deref())
        .and_then(|request| request.price(product.price))
        .map_err(|e| PageError::flash_error(back.clone(), e.to_string()))?;

    let order = Order::place(vendor_id, product.wholesaler_id, product.id, priced, Utc::now());
    state.db.orders().place(&order).await?;

    info!(
        order_id = %order.id,
        vendor_id = %vendor_id,
        wholesaler_id = %order.wholesaler_id,
        quantity = order.quantity,
        total = %order.total_amount,
        "order placed"
    );
    Ok(flash_redirect(
        &back,
        FlashMessage::success(format!("Order placed successfully for {}!", product.name)),
    ))
}

pub async fn update_order_status(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let owner = session.claims().require_wholesaler()?.id;
    let Json(req) = payload?;

    let status = OrderStatus::parse(&req.status)?;
    let id: OrderId = req
        .order_id
        .parse()
        .map_err(|_| ApiError::NotFound("Order not found"))?;

    let order = state
        .db
        .orders()
        .set_status(id, owner, status)
        .await?
        .ok_or(ApiError::NotFound("Order not found"))?;
    info!(order_id = %id, %status, rollup_date = %order.rollup_date(), "order status updated");

    Ok(Json(json!({ "success": true })))
}

pub async fn wholesaler_orders(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;
    let orders = state.db.orders().for_wholesaler(me.id).await?;
    Ok(page(flashes, json!({ "wholesaler_name": me.name, "orders": orders })))
}

pub async fn vendor_dashboard(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_vendor()?;
    let recent_orders = state.db.orders().for_vendor(me.id, Some(DASHBOARD_ORDERS)).await?;
    let categories = state.db.products().categories().await?;
    Ok(page(
        flashes,
        json!({
            "vendor_name": me.name,
            "recent_orders": recent_orders,
            "categories": categories,
        }),
    ))
}

pub async fn vendor_orders(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_vendor()?;
    let orders = state.db.orders().for_vendor(me.id, None).await?;
    Ok(page(flashes, json!({ "vendor_name": me.name, "orders": orders })))
}
