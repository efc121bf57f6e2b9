use std::collections::HashMap;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use vendorclub_auth::SessionClaims;

use crate::app::AppState;
use crate::app::cookies::{FLASH_COOKIE, SESSION_COOKIE, decode_flashes};
use crate::context::{PendingFlashes, Session};

/// Attach the request's [`Session`] and [`PendingFlashes`].
///
/// Never rejects: role checks happen in handlers, which know whether to
/// answer with a redirect or a 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let now = Utc::now();
    let cookies = parse_cookies(req.headers());

    let claims = cookies
        .get(SESSION_COOKIE)
        .and_then(|token| match state.codec.decode(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "ignoring session cookie");
                None
            }
        })
        .unwrap_or_else(|| SessionClaims::anonymous(now, state.session_ttl));

    let flashes = cookies
        .get(FLASH_COOKIE)
        .map(|raw| decode_flashes(raw))
        .unwrap_or_default();

    req.extensions_mut().insert(Session::new(claims));
    req.extensions_mut().insert(PendingFlashes(flashes));

    next.run(req).await
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
