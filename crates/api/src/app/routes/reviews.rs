use axum::{
    Extension, Json,
    extract::rejection::JsonRejection,
    response::Response,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

use vendorclub_core::{ReviewId, WholesalerId};
use vendorclub_reviews::{Reply, Review, ReviewDraft};

use crate::app::AppState;
use crate::app::dto::{LeaveReviewRequest, ReplyReviewRequest};
use crate::app::errors::{ApiError, PageError};
use crate::app::pages::page;
use crate::context::{PendingFlashes, Session};

pub async fn leave_review(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<LeaveReviewRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let vendor_id = session.claims().require_vendor()?.id;
    let Json(req) = payload?;

    let wholesaler_id: WholesalerId = req
        .wholesaler_id
        .parse()
        .map_err(|_| ApiError::NotFound("Wholesaler not found"))?;
    if !state.db.wholesalers().exists(wholesaler_id).await? {
        return Err(ApiError::NotFound("Wholesaler not found"));
    }

    let draft = ReviewDraft::new(wholesaler_id, req.rating, &req.comment)?;
    let review = Review::write(vendor_id, draft, Utc::now());
    state.db.reviews().insert(&review).await?;
    info!(review_id = %review.id, %wholesaler_id, rating = review.rating.value(), "review left");

    Ok(Json(json!({ "success": true, "review_id": review.id })))
}

pub async fn reply_review(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ReplyReviewRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let owner = session.claims().require_wholesaler()?.id;
    let Json(req) = payload?;

    let reply = Reply::parse(&req.reply)?;
    let id: ReviewId = req
        .review_id
        .parse()
        .map_err(|_| ApiError::NotFound("Review not found"))?;
    if !state.db.reviews().set_reply(id, owner, reply).await? {
        return Err(ApiError::NotFound("Review not found"));
    }
    info!(review_id = %id, "review answered");

    Ok(Json(json!({ "success": true })))
}

pub async fn wholesaler_reviews(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;
    let reviews = state.db.reviews().for_wholesaler(me.id, None).await?;
    Ok(page(flashes, json!({ "wholesaler_name": me.name, "reviews": reviews })))
}
