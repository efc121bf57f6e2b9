use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use vendorclub_auth::{AuthzError, PasswordError, Role, SessionCodecError};
use vendorclub_core::DomainError;
use vendorclub_infra::{StoreError, UploadError};

use crate::app::cookies::flash_redirect;
use crate::context::FlashMessage;

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Failure of a hashing task run off the async runtime.
#[derive(Debug, Error)]
pub enum PasswordTaskError {
    #[error(transparent)]
    Hash(#[from] PasswordError),

    #[error("password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Error answer of a JSON endpoint.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    NotFound(&'static str),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(_: AuthzError) -> Self {
        ApiError::Unauthorized
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ApiError::NotFound("not found"),
            DomainError::Unauthorized => ApiError::Unauthorized,
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<PasswordTaskError> for ApiError {
    fn from(err: PasswordTaskError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error answer of a page or form endpoint: browsers get redirected.
#[derive(Debug)]
pub enum PageError {
    /// The session lacks the role; go to that role's login page.
    Login(Role),
    /// Redirect with a flash message.
    Flash { to: String, flash: FlashMessage },
    NotFound,
    Internal(String),
}

impl PageError {
    pub fn flash_error(to: impl Into<String>, message: impl Into<String>) -> Self {
        PageError::Flash { to: to.into(), flash: FlashMessage::error(message) }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Login(role) => Redirect::to(role.login_path()).into_response(),
            PageError::Flash { to, flash } => flash_redirect(&to, flash),
            PageError::NotFound => json_error(StatusCode::NOT_FOUND, "File not found"),
            PageError::Internal(detail) => {
                error!(%detail, "page request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<AuthzError> for PageError {
    fn from(err: AuthzError) -> Self {
        PageError::Login(err.role())
    }
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<SessionCodecError> for PageError {
    fn from(err: SessionCodecError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<PasswordTaskError> for PageError {
    fn from(err: PasswordTaskError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<UploadError> for PageError {
    fn from(err: UploadError) -> Self {
        PageError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    #[test]
    fn missing_role_maps_to_401_for_api_and_login_redirect_for_pages() {
        let err = AuthzError::MissingRole(Role::Vendor);

        let api = ApiError::from(err).into_response();
        assert_eq!(api.status(), StatusCode::UNAUTHORIZED);

        let page = PageError::from(err).into_response();
        assert_eq!(page.status(), StatusCode::SEE_OTHER);
        assert_eq!(page.headers().get(header::LOCATION).unwrap(), "/vendor/login");
    }

    #[test]
    fn validation_maps_to_400_with_message() {
        let res = ApiError::from(DomainError::validation("rating must be between 1 and 5, got 9"))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_are_not_leaked() {
        let res = ApiError::from(StoreError::Corrupt("bad uuid".into())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
