//! HTTP API: routing, session cookies, and request/response mapping.

pub mod app;
pub mod context;
pub mod middleware;
