//! Session and flash cookies.

use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use tracing::warn;

use vendorclub_auth::{SessionClaims, SessionCodecError};

use crate::app::AppState;
use crate::context::FlashMessage;

pub const SESSION_COOKIE: &str = "vc_session";
pub const FLASH_COOKIE: &str = "vc_flash";

/// Flash messages from a cookie value; anything unreadable is dropped.
pub fn decode_flashes(raw: &str) -> Vec<FlashMessage> {
    urlencoding::decode(raw)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

pub fn encode_flashes(flashes: &[FlashMessage]) -> String {
    let json = serde_json::to_string(flashes).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

fn cookie(name: &str, value: &str, max_age: Option<i64>) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(seconds) = max_age {
        cookie.push_str(&format!("; Max-Age={seconds}"));
    }
    cookie
}

fn append_cookie(res: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "dropping unencodable cookie"),
    }
}

/// Expire the flash cookie (the page consumed its messages).
pub fn clear_flashes(res: &mut Response) {
    append_cookie(res, cookie(FLASH_COOKIE, "", Some(0)));
}

/// Redirect (303) carrying one flash message to the next page.
pub fn flash_redirect(to: &str, flash: FlashMessage) -> Response {
    let mut res = Redirect::to(to).into_response();
    append_cookie(&mut res, cookie(FLASH_COOKIE, &encode_flashes(&[flash]), None));
    res
}

/// Write the session cookie for `claims`, renewing its validity window.
/// An empty session removes the cookie instead.
pub fn store_session(
    res: &mut Response,
    state: &AppState,
    claims: SessionClaims,
) -> Result<(), SessionCodecError> {
    if claims.is_empty() {
        append_cookie(res, cookie(SESSION_COOKIE, "", Some(0)));
        return Ok(());
    }

    let claims = claims.renewed(Utc::now(), state.session_ttl);
    let token = state.codec.encode(&claims)?;
    append_cookie(res, cookie(SESSION_COOKIE, &token, Some(state.session_ttl.num_seconds())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flashes_survive_the_cookie_encoding() {
        let flashes = vec![
            FlashMessage::success("Order placed successfully for Organic Tomatoes!"),
            FlashMessage::error("Invalid phone or password."),
        ];
        let encoded = encode_flashes(&flashes);
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains(';'));
        assert_eq!(decode_flashes(&encoded), flashes);
    }

    #[test]
    fn garbage_flash_cookie_is_ignored() {
        assert!(decode_flashes("%7Bnot-json").is_empty());
    }

    #[test]
    fn flash_redirect_is_see_other_with_cookie() {
        let res = flash_redirect("/vendor/login", FlashMessage::success("Logged out successfully!"));
        assert_eq!(res.status(), axum::http::StatusCode::SEE_OTHER);
        let set_cookie = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("vc_flash="));
    }
}
