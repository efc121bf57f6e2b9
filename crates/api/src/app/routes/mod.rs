use axum::{
    Router,
    routing::{get, post},
};

pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod orders;
pub mod reviews;
pub mod system;
pub mod wholesaler;

pub fn router() -> Router {
    Router::new()
        .route("/", get(system::index))
        .route("/static/uploads/:file_name", get(system::uploaded_file))
        // registration and login
        .route(
            "/register-wholesaler",
            get(accounts::register_wholesaler_page).post(accounts::register_wholesaler),
        )
        .route(
            "/wholesaler/login",
            get(accounts::wholesaler_login_page).post(accounts::wholesaler_login),
        )
        .route("/wholesaler/logout", get(accounts::wholesaler_logout))
        .route(
            "/vendor/signup",
            get(accounts::vendor_signup_page).post(accounts::vendor_signup),
        )
        .route(
            "/vendor/login",
            get(accounts::vendor_login_page).post(accounts::vendor_login),
        )
        .route("/vendor/logout", get(accounts::vendor_logout))
        // admin
        .route("/admin/login", get(admin::login_page).post(admin::login))
        .route("/admin/logout", get(admin::logout))
        .route("/admin/wholesalers", get(admin::pending_wholesalers))
        .route("/admin/vendors", get(admin::pending_vendors))
        .route("/admin/approve/:id", post(admin::approve_wholesaler))
        .route("/admin/reject/:id", post(admin::reject_wholesaler))
        .route("/admin/vendors/approve/:id", post(admin::approve_vendor))
        .route("/admin/vendors/reject/:id", post(admin::reject_vendor))
        .route("/download/*path", get(admin::download))
        // wholesaler pages
        .route("/wholesaler/dashboard", get(wholesaler::dashboard))
        .route("/wholesaler/profile", get(wholesaler::profile))
        .route(
            "/wholesaler/edit-profile",
            get(wholesaler::edit_profile_page).post(wholesaler::edit_profile),
        )
        .route("/wholesaler/change-password", post(wholesaler::change_password))
        .route("/wholesaler/analytics", get(wholesaler::analytics))
        .route("/wholesaler/reviews", get(reviews::wholesaler_reviews))
        .route("/wholesaler/products", get(catalog::list_products))
        .route(
            "/wholesaler/add-product",
            get(catalog::add_product_page).post(catalog::add_product),
        )
        .route(
            "/wholesaler/edit-product/:id",
            get(catalog::edit_product_page).post(catalog::edit_product),
        )
        .route("/wholesaler/orders", get(orders::wholesaler_orders))
        // JSON endpoints
        .route("/api/update-stock", post(catalog::update_stock))
        .route("/api/delete-product", post(catalog::delete_product))
        .route("/api/like-product", post(catalog::like_product))
        .route("/api/update-order-status", post(orders::update_order_status))
        .route("/api/leave-review", post(reviews::leave_review))
        .route("/api/reply-review", post(reviews::reply_review))
        .route("/api/upload-profile-photo", post(wholesaler::upload_profile_photo))
        // vendor pages
        .route("/vendor/dashboard", get(orders::vendor_dashboard))
        .route("/vendor/orders", get(orders::vendor_orders))
        .route("/vendor/order", post(orders::place_order))
        .route("/vendor/category/:slug", get(catalog::browse_category))
        .route("/vendor/search", get(catalog::search))
        .route("/vendor/product/:id", get(catalog::product_detail))
}
