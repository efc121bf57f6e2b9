//! Admin login and the approval queues.

use axum::{
    Extension, Form,
    extract::Path,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::{debug, info, warn};

use vendorclub_auth::Role;
use vendorclub_core::{VendorId, WholesalerId};

use crate::app::AppState;
use crate::app::cookies::{flash_redirect, store_session};
use crate::app::dto::AdminLoginForm;
use crate::app::errors::PageError;
use crate::app::pages::page;
use crate::app::routes::system::content_type;
use crate::context::{FlashMessage, PendingFlashes, Session};

const WHOLESALERS_PATH: &str = "/admin/wholesalers";
const VENDORS_PATH: &str = "/admin/vendors";

pub async fn login_page(Extension(flashes): Extension<PendingFlashes>) -> Response {
    page(flashes, json!({ "role": Role::Admin }))
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<AdminLoginForm>,
) -> Result<Response, PageError> {
    if !state.admin.verify(&form.username, &form.password) {
        warn!(username = %form.username, "admin login refused");
        return Err(PageError::flash_error(Role::Admin.login_path(), "Invalid credentials"));
    }

    let mut claims = session.into_claims();
    claims.sign_in_admin();
    info!("admin logged in");

    let mut res = Redirect::to(WHOLESALERS_PATH).into_response();
    store_session(&mut res, &state, claims)?;
    Ok(res)
}

pub async fn logout(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, PageError> {
    let mut claims = session.into_claims();
    claims.sign_out(Role::Admin);

    let mut res = Redirect::to("/").into_response();
    store_session(&mut res, &state, claims)?;
    Ok(res)
}

pub async fn pending_wholesalers(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let wholesalers = state.db.wholesalers().pending().await?;
    Ok(page(flashes, json!({ "wholesalers": wholesalers })))
}

pub async fn pending_vendors(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let vendors = state.db.vendors().pending().await?;
    Ok(page(flashes, json!({ "vendors": vendors })))
}

pub async fn approve_wholesaler(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let not_found = || PageError::flash_error(WHOLESALERS_PATH, "Wholesaler not found.");

    let id: WholesalerId = id.parse().map_err(|_| not_found())?;
    if !state.db.wholesalers().approve(id).await? {
        return Err(not_found());
    }

    info!(wholesaler_id = %id, "wholesaler approved");
    Ok(flash_redirect(
        WHOLESALERS_PATH,
        FlashMessage::success("Wholesaler approved successfully!"),
    ))
}

/// Remove a pending application together with its uploaded documents.
pub async fn reject_wholesaler(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let not_found = || PageError::flash_error(WHOLESALERS_PATH, "Wholesaler not found.");

    let id: WholesalerId = id.parse().map_err(|_| not_found())?;
    let documents = state.db.wholesalers().reject(id).await?.ok_or_else(not_found)?;

    for path in [documents.id_doc_path, documents.license_doc_path].into_iter().flatten() {
        if let Err(e) = state.uploads.delete(&path).await {
            warn!(%path, error = %e, "could not remove document of rejected wholesaler");
        }
    }

    info!(wholesaler_id = %id, "wholesaler rejected");
    Ok(flash_redirect(
        WHOLESALERS_PATH,
        FlashMessage::success("Wholesaler application rejected and removed."),
    ))
}

pub async fn approve_vendor(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let not_found = || PageError::flash_error(VENDORS_PATH, "Vendor not found.");

    let id: VendorId = id.parse().map_err(|_| not_found())?;
    if !state.db.vendors().approve(id).await? {
        return Err(not_found());
    }

    info!(vendor_id = %id, "vendor approved");
    Ok(flash_redirect(VENDORS_PATH, FlashMessage::success("Vendor approved successfully!")))
}

pub async fn reject_vendor(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let not_found = || PageError::flash_error(VENDORS_PATH, "Vendor not found.");

    let id: VendorId = id.parse().map_err(|_| not_found())?;
    if !state.db.vendors().reject(id).await? {
        return Err(not_found());
    }

    info!(vendor_id = %id, "vendor rejected");
    Ok(flash_redirect(
        VENDORS_PATH,
        FlashMessage::success("Vendor application rejected and removed."),
    ))
}

/// Download an uploaded document by its stored relative path
/// (`uploads/<name>`).
pub async fn download(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(path): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_admin()?;
    let path = path.trim_start_matches('/');

    let file = state.uploads.resolve_relative(path).map_err(|e| {
        warn!(%path, error = %e, "refused document download");
        PageError::NotFound
    })?;
    let bytes = tokio::fs::read(&file).await.map_err(|e| {
        debug!(%path, error = %e, "document not readable");
        PageError::NotFound
    })?;

    let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
    Ok((
        [
            (header::CONTENT_TYPE, content_type(&file_name).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
