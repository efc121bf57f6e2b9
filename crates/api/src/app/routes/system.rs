use axum::{
    Extension, Json,
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::app::AppState;
use crate::app::errors::PageError;
use crate::app::pages::page;
use crate::context::{PendingFlashes, Session};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Landing page: who is signed in, and where each role starts.
pub async fn index(
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Response {
    let claims = session.claims();
    page(
        flashes,
        json!({
            "app": "VendorClub",
            "wholesaler": claims.wholesaler.as_ref().map(|w| &w.name),
            "vendor": claims.vendor.as_ref().map(|v| &v.name),
            "is_admin": claims.is_admin,
            "links": {
                "register_wholesaler": "/register-wholesaler",
                "wholesaler_login": "/wholesaler/login",
                "vendor_signup": "/vendor/signup",
                "vendor_login": "/vendor/login",
                "admin_login": "/admin/login",
            },
        }),
    )
}

/// Serve a stored upload by file name.
pub async fn uploaded_file(
    Extension(state): Extension<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, PageError> {
    let path = state.uploads.resolve(&file_name).map_err(|_| PageError::NotFound)?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        debug!(file = %file_name, error = %e, "upload not readable");
        PageError::NotFound
    })?;
    Ok(([(header::CONTENT_TYPE, content_type(&file_name))], bytes).into_response())
}

pub(crate) fn content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type("profile_1_me.JPG"), "image/jpeg");
        assert_eq!(content_type("license_2_doc.pdf"), "application/pdf");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }
}
