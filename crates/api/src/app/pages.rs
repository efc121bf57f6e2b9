use axum::Json;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::app::cookies::clear_flashes;
use crate::context::PendingFlashes;

/// A page body: `data` plus the pending flash messages, which are consumed.
pub fn page(flashes: PendingFlashes, mut data: Value) -> Response {
    let consumed = !flashes.is_empty();
    if let Value::Object(map) = &mut data {
        map.insert("flashes".to_string(), json!(flashes.0));
    }

    let mut res = Json(data).into_response();
    if consumed {
        clear_flashes(&mut res);
    }
    res
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;
    use crate::context::FlashMessage;

    #[test]
    fn page_without_flashes_leaves_cookie_alone() {
        let res = page(PendingFlashes::default(), json!({ "products": [] }));
        assert!(res.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn page_with_flashes_clears_cookie() {
        let flashes = PendingFlashes(vec![FlashMessage::success("Product added successfully!")]);
        let res = page(flashes, json!({}));
        let set_cookie = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
