//! Product catalog: wholesaler product management and vendor browsing.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, rejection::JsonRejection},
    response::Response,
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};

use vendorclub_core::ProductId;
use vendorclub_infra::allowed_file;
use vendorclub_products::{Product, ProductForm, catalog_category_for_slug};

use crate::app::AppState;
use crate::app::cookies::flash_redirect;
use crate::app::dto::{ProductRef, SearchQuery, UpdateStockRequest};
use crate::app::errors::{ApiError, PageError};
use crate::app::forms::{MultipartForm, UploadedFile};
use crate::app::pages::page;
use crate::context::{FlashMessage, PendingFlashes, Session};

const PRODUCTS_PATH: &str = "/wholesaler/products";
const ADD_PRODUCT_PATH: &str = "/wholesaler/add-product";

fn product_form(form: &MultipartForm) -> ProductForm {
    ProductForm {
        name: form.text("name"),
        main_category: form.optional_text("main_category"),
        category: form.optional_text("category"),
        subcategory: form.optional_text("subcategory"),
        price: form.text("price"),
        stock: form.text("stock"),
    }
}

/// Store an optional product image; disallowed types are ignored.
async fn save_image(state: &AppState, file: Option<UploadedFile>) -> Result<Option<String>, PageError> {
    match file {
        Some(file) if allowed_file(&file.file_name) => {
            Ok(Some(state.uploads.save("product", &file.file_name, &file.bytes).await?))
        }
        Some(file) => {
            warn!(file = %file.file_name, "product image skipped: type not allowed");
            Ok(None)
        }
        None => Ok(None),
    }
}

async fn remove_upload(state: &AppState, path: &str) {
    if let Err(e) = state.uploads.delete(path).await {
        warn!(%path, error = %e, "could not remove product image");
    }
}

pub async fn list_products(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;
    let products = state.db.products().for_wholesaler(me.id, None).await?;
    Ok(page(flashes, json!({ "wholesaler_name": me.name, "products": products })))
}

pub async fn add_product_page(
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
) -> Result<Response, PageError> {
    let me = session.claims().require_wholesaler()?;
    Ok(page(flashes, json!({ "wholesaler_name": me.name })))
}

pub async fn add_product(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let owner = session.claims().require_wholesaler()?.id;
    let mut form = MultipartForm::read(multipart)
        .await
        .map_err(|e| PageError::flash_error(ADD_PRODUCT_PATH, e.body_text()))?;

    let draft = product_form(&form)
        .validate()
        .map_err(|e| PageError::flash_error(ADD_PRODUCT_PATH, e.to_string()))?;
    let image = save_image(&state, form.take_file("product_image")).await?;

    let product = Product::create(ProductId::new(), owner, draft, image, Utc::now());
    if let Err(e) = state.db.products().insert(&product).await {
        if let Some(path) = &product.image_path {
            remove_upload(&state, path).await;
        }
        return Err(e.into());
    }

    info!(product_id = %product.id, wholesaler_id = %owner, status = product.status.label(), "product added");
    Ok(flash_redirect(
        "/wholesaler/dashboard",
        FlashMessage::success("Product added successfully!"),
    ))
}

async fn owned_product(state: &AppState, session: &Session, id: &str) -> Result<Product, PageError> {
    let owner = session.claims().require_wholesaler()?.id;
    let not_found = || PageError::flash_error(PRODUCTS_PATH, "Product not found.");

    let id: ProductId = id.parse().map_err(|_| not_found())?;
    state.db.products().find_owned(id, owner).await?.ok_or_else(not_found)
}

pub async fn edit_product_page(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let product = owned_product(&state, &session, &id).await?;
    Ok(page(flashes, json!({ "product": product })))
}

pub async fn edit_product(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut product = owned_product(&state, &session, &id).await?;
    let edit_path = format!("/wholesaler/edit-product/{}", product.id);

    let mut form = MultipartForm::read(multipart)
        .await
        .map_err(|e| PageError::flash_error(edit_path.clone(), e.body_text()))?;
    let draft = product_form(&form)
        .validate()
        .map_err(|e| PageError::flash_error(edit_path, e.to_string()))?;

    let new_image = save_image(&state, form.take_file("product_image")).await?;
    let replaced = new_image.as_ref().and(product.image_path.clone());
    product.apply_edit(draft, new_image.clone());

    persist_edit(&state, &product, new_image.as_deref()).await?;
    if let Some(old) = replaced {
        remove_upload(&state, &old).await;
    }

    info!(product_id = %product.id, status = product.status.label(), "product updated");
    Ok(flash_redirect(PRODUCTS_PATH, FlashMessage::success("Product updated successfully!")))
}

/// Write an edited product. The freshly stored image is removed again when
/// the row could not be written.
async fn persist_edit(state: &AppState, product: &Product, new_image: Option<&str>) -> Result<(), PageError> {
    let written = state.db.products().update(product).await;
    if !matches!(written, Ok(true)) {
        if let Some(path) = new_image {
            remove_upload(state, path).await;
        }
    }
    if written? {
        Ok(())
    } else {
        Err(PageError::flash_error(PRODUCTS_PATH, "Product not found."))
    }
}

pub async fn update_stock(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<UpdateStockRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let owner = session.claims().require_wholesaler()?.id;
    let Json(req) = payload?;

    let id: ProductId = req
        .product_id
        .parse()
        .map_err(|_| ApiError::NotFound("Product not found"))?;
    let mut product = state
        .db
        .products()
        .find_owned(id, owner)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;

    let status = product.set_stock(req.stock)?;
    if !state.db.products().set_stock(&product).await? {
        return Err(ApiError::NotFound("Product not found"));
    }
    info!(product_id = %id, stock = product.stock, status = status.label(), "stock updated");

    Ok(Json(json!({ "success": true, "status": status.label() })))
}

pub async fn delete_product(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ProductRef>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let owner = session.claims().require_wholesaler()?.id;
    let Json(req) = payload?;
    let id: ProductId = req
        .product_id
        .parse()
        .map_err(|_| ApiError::NotFound("Product not found"))?;

    let image = state
        .db
        .products()
        .delete_owned(id, owner)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;
    if let Some(path) = image {
        remove_upload(&state, &path).await;
    }
    info!(product_id = %id, "product deleted");

    Ok(Json(json!({ "success": true })))
}

pub async fn browse_category(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_vendor()?;
    let category = catalog_category_for_slug(&slug);
    let products = state.db.products().in_category(category).await?;
    Ok(page(
        flashes,
        json!({ "category_id": slug, "category_name": category, "products": products }),
    ))
}

pub async fn search(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, PageError> {
    session.claims().require_vendor()?;
    let q = query.q.trim();
    let products = state.db.products().search(q).await?;
    Ok(page(flashes, json!({ "query": q, "products": products })))
}

pub async fn product_detail(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Extension(flashes): Extension<PendingFlashes>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    session.claims().require_vendor()?;
    let not_found = || PageError::flash_error("/vendor/dashboard", "Product not found!");

    let id: ProductId = id.parse().map_err(|_| not_found())?;
    let product = state.db.products().record_view(id).await?.ok_or_else(not_found)?;
    Ok(page(flashes, json!({ "product": product })))
}

pub async fn like_product(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ProductRef>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    session.claims().require_vendor()?;
    let Json(req) = payload?;
    let id: ProductId = req
        .product_id
        .parse()
        .map_err(|_| ApiError::NotFound("Product not found"))?;

    let likes = state
        .db
        .products()
        .like(id)
        .await?
        .ok_or(ApiError::NotFound("Product not found"))?;
    Ok(Json(json!({ "success": true, "likes": likes })))
}
