//! Wholesaler dashboard, profile and account settings.

use axum::{
    Extension, Form, Json,
    extract::{Multipart, rejection::JsonRejection},
    response::Response,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};

use vendorclub_analytics::ROLLUP_HISTORY_DAYS;
use vendorclub_auth::Role;
use vendorclub_infra::allowed_file;
use vendorclub_parties::{PasswordChange, ProfileUpdate};

use crate::app::AppState;
use crate::app::cookies::{flash_redirect, store_session};
use crate::app::errors::{ApiError, PageError};
use crate::app::forms::MultipartForm;
use crate::app::pages::page;
use crate::app::passwords;
use crate::context::{FlashMessage, PendingFlashes, Session};

const DASHBOARD_PRODUCTS: i64 = 4;
const DASHBOARD_REVIEWS: i64 = 3;

/// `/static/uploads/<name>` for a stored `uploads/<name>` path.
pub(crate) fn static_url(relative_path: &str) -> String {
    format!("/static/{relative_path}")
}

pub async fn dashboard(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;

    let stats = state.db.analytics().dashboard_stats(me.id, Utc::now()).await?;
    let recent_products = state.db.products().for_wholesaler(me.id, Some(DASHBOARD_PRODUCTS)).await?;
    let recent_reviews = state.db.reviews().for_wholesaler(me.id, Some(DASHBOARD_REVIEWS)).await?;

    Ok(page(
        flashes,
        json!({
            "wholesaler_name": me.name,
            "stats": stats,
            "recent_products": recent_products,
            "recent_reviews": recent_reviews,
        }),
    ))
}

async fn profile_body(state: &AppState, session: &Session) -> Result<Value, PageError> {
    let me = session.claims().require_wholesaler()?;
    let wholesaler = state
        .db
        .wholesalers()
        .find(me.id)
        .await?
        .ok_or_else(|| PageError::flash_error(Role::Wholesaler.login_path(), "Wholesaler not found."))?;
    let photo_url = wholesaler.profile_photo.as_deref().map(static_url);
    Ok(json!({ "wholesaler": wholesaler, "profile_photo_url": photo_url }))
}

pub async fn profile(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let body = profile_body(&state, &session).await?;
    Ok(page(flashes, body))
}

pub async fn edit_profile_page(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let body = profile_body(&state, &session).await?;
    Ok(page(flashes, body))
}

pub async fn edit_profile(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Form(update): Form<ProfileUpdate>,
) -> Result<Response, PageError> {
    let id = session.claims().require_wholesaler()?.id;
    let update = update
        .validate()
        .map_err(|e| PageError::flash_error("/wholesaler/edit-profile", e.to_string()))?;

    if !state.db.wholesalers().update_profile(id, &update).await? {
        return Err(PageError::flash_error(Role::Wholesaler.login_path(), "Wholesaler not found."));
    }
    info!(wholesaler_id = %id, "profile updated");

    let mut claims = session.into_claims();
    claims.sign_in_wholesaler(id, update.name);

    let mut res = flash_redirect(
        "/wholesaler/profile",
        FlashMessage::success("Profile updated successfully!"),
    );
    store_session(&mut res, &state, claims)?;
    Ok(res)
}

pub async fn change_password(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = session.claims().require_wholesaler()?.id;
    let Json(change) = payload?;
    let change = change.validate()?;

    let stored = state
        .db
        .wholesalers()
        .password_hash(id)
        .await?
        .ok_or(ApiError::NotFound("Wholesaler not found"))?;
    if !passwords::verify(change.current_password, stored).await {
        return Err(ApiError::BadRequest("Current password is incorrect".into()));
    }

    let new_hash = passwords::hash(change.new_password, state.bcrypt_cost).await?;
    if !state.db.wholesalers().set_password_hash(id, &new_hash).await? {
        return Err(ApiError::NotFound("Wholesaler not found"));
    }
    info!(wholesaler_id = %id, "password changed");

    Ok(Json(json!({ "success": true, "message": "Password changed successfully" })))
}

pub async fn upload_profile_photo(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let id = session.claims().require_wholesaler()?.id;
    let mut form = MultipartForm::read(multipart).await?;

    let file = form
        .take_file("profile_photo")
        .ok_or_else(|| ApiError::BadRequest("No file selected".into()))?;
    if !allowed_file(&file.file_name) {
        return Err(ApiError::BadRequest("Invalid file type".into()));
    }

    let stored = state
        .uploads
        .save(&format!("profile_{id}"), &file.file_name, &file.bytes)
        .await?;

    let Some(previous) = state.db.wholesalers().replace_profile_photo(id, &stored).await? else {
        if let Err(e) = state.uploads.delete(&stored).await {
            warn!(path = %stored, error = %e, "could not remove orphaned photo");
        }
        return Err(ApiError::NotFound("Wholesaler not found"));
    };

    if let Some(previous) = previous {
        if let Err(e) = state.uploads.delete(&previous).await {
            warn!(path = %previous, error = %e, "could not remove previous profile photo");
        }
    }
    info!(wholesaler_id = %id, "profile photo replaced");

    Ok(Json(json!({ "success": true, "photo_url": static_url(&stored) })))
}

pub async fn analytics(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;
    let rollups = state.db.analytics().recent(me.id, ROLLUP_HISTORY_DAYS).await?;
    Ok(page(
        flashes,
        json!({ "wholesaler_name": me.name, "analytics": rollups }),
    ))
}
