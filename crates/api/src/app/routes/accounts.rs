//! Wholesaler registration, vendor signup, and phone + password login for
//! both roles.

use axum::{
    Extension, Form,
    extract::Multipart,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use vendorclub_auth::Role;
use vendorclub_infra::stores::WholesalerDocuments;
use vendorclub_infra::{StoreError, UploadError, allowed_file};
use vendorclub_parties::{LoginAccount, LoginError, NewVendor, NewWholesaler, Phone, evaluate_login};

use crate::app::AppState;
use crate::app::cookies::{flash_redirect, store_session};
use crate::app::dto::PhoneLoginForm;
use crate::app::errors::PageError;
use crate::app::forms::{MultipartForm, UploadedFile};
use crate::app::pages::page;
use crate::app::passwords;
use crate::context::{FlashMessage, PendingFlashes, Session};

const REGISTER_PATH: &str = "/register-wholesaler";
const SIGNUP_PATH: &str = "/vendor/signup";

const DUPLICATE_WHOLESALER_PHONE: &str =
    "Phone number already registered. Please use a different number.";
const DUPLICATE_VENDOR: &str = "Email or phone number already exists.";

pub async fn register_wholesaler_page(Extension(flashes): Extension<PendingFlashes>) -> Response {
    page(
        flashes,
        json!({ "fields": ["name", "phone", "password", "shop_name", "sourcing_info", "location"],
                "files": ["id_proof", "license_doc"] }),
    )
}

pub async fn register_wholesaler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut form = MultipartForm::read(multipart)
        .await
        .map_err(|e| PageError::flash_error(REGISTER_PATH, e.body_text()))?;

    let registration = NewWholesaler {
        name: form.text("name"),
        phone: form.text("phone"),
        password: form.text("password"),
        shop_name: form.text("shop_name"),
        sourcing_info: form.text("sourcing_info"),
        location: form.text("location"),
    }
    .validate()
    .map_err(|e| PageError::flash_error(REGISTER_PATH, e.to_string()))?;

    if state.db.wholesalers().login_account(&registration.phone).await?.is_some() {
        return Err(PageError::flash_error(REGISTER_PATH, DUPLICATE_WHOLESALER_PHONE));
    }

    let documents = WholesalerDocuments {
        id_doc_path: save_document(&state, "id_proof", form.take_file("id_proof")).await?,
        license_doc_path: save_document(&state, "license", form.take_file("license_doc")).await?,
    };

    let password_hash = passwords::hash(registration.password.clone(), state.bcrypt_cost).await?;
    let wholesaler = match state
        .db
        .wholesalers()
        .register(registration, &password_hash, documents.clone(), Utc::now())
        .await
    {
        Ok(wholesaler) => wholesaler,
        Err(StoreError::Conflict(_)) => {
            discard_documents(&state, &documents).await;
            return Err(PageError::flash_error(REGISTER_PATH, DUPLICATE_WHOLESALER_PHONE));
        }
        Err(e) => return Err(e.into()),
    };

    info!(wholesaler_id = %wholesaler.id, "wholesaler registered, awaiting approval");
    Ok(flash_redirect(
        REGISTER_PATH,
        FlashMessage::success("Thank you for registering! Your application is pending approval."),
    ))
}

/// Store an optional registration document; disallowed types are skipped.
async fn save_document(
    state: &AppState,
    prefix: &str,
    file: Option<UploadedFile>,
) -> Result<Option<String>, PageError> {
    let Some(file) = file else {
        return Ok(None);
    };
    if !allowed_file(&file.file_name) {
        warn!(file = %file.file_name, "registration document skipped: type not allowed");
        return Ok(None);
    }
    match state.uploads.save(prefix, &file.file_name, &file.bytes).await {
        Ok(path) => Ok(Some(path)),
        Err(UploadError::DisallowedType) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn discard_documents(state: &AppState, documents: &WholesalerDocuments) {
    for path in [&documents.id_doc_path, &documents.license_doc_path].into_iter().flatten() {
        if let Err(e) = state.uploads.delete(path).await {
            warn!(%path, error = %e, "could not remove document");
        }
    }
}

pub async fn wholesaler_login_page(Extension(flashes): Extension<PendingFlashes>) -> Response {
    page(flashes, json!({ "role": Role::Wholesaler }))
}

pub async fn wholesaler_login(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<PhoneLoginForm>,
) -> Result<Response, PageError> {
    let login_path = Role::Wholesaler.login_path();
    let account = match Phone::parse(&form.phone) {
        Ok(phone) => state.db.wholesalers().login_account(&phone).await?,
        Err(_) => None,
    };

    match check_login(account, form.password).await {
        Ok(account) => {
            let mut claims = session.into_claims();
            claims.sign_in_wholesaler(account.id, account.name);
            info!(wholesaler_id = %account.id, "wholesaler logged in");

            let mut res = Redirect::to("/wholesaler/dashboard").into_response();
            store_session(&mut res, &state, claims)?;
            Ok(res)
        }
        Err(err) => {
            warn!(reason = ?err, "wholesaler login refused");
            let message = err.wholesaler_message();
            let flash = match err {
                LoginError::PendingApproval => FlashMessage::warning(message),
                _ => FlashMessage::error(message),
            };
            Ok(flash_redirect(login_path, flash))
        }
    }
}

pub async fn wholesaler_logout(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, PageError> {
    let mut claims = session.into_claims();
    claims.sign_out(Role::Wholesaler);

    let mut res = Redirect::to("/").into_response();
    store_session(&mut res, &state, claims)?;
    Ok(res)
}

pub async fn vendor_signup_page(Extension(flashes): Extension<PendingFlashes>) -> Response {
    page(
        flashes,
        json!({ "fields": ["name", "email", "phone", "password", "location"] }),
    )
}

pub async fn vendor_signup(
    Extension(state): Extension<AppState>,
    Form(signup): Form<NewVendor>,
) -> Result<Response, PageError> {
    let signup = signup
        .validate()
        .map_err(|e| PageError::flash_error(SIGNUP_PATH, e.to_string()))?;

    let password_hash = passwords::hash(signup.password.clone(), state.bcrypt_cost).await?;
    match state.db.vendors().register(signup, &password_hash, Utc::now()).await {
        Ok(vendor) => {
            info!(vendor_id = %vendor.id, "vendor signed up, awaiting approval");
            Ok(flash_redirect(
                Role::Vendor.login_path(),
                FlashMessage::success("Registration successful! Your account is pending approval."),
            ))
        }
        Err(StoreError::Conflict(_)) => Err(PageError::flash_error(SIGNUP_PATH, DUPLICATE_VENDOR)),
        Err(e) => Err(e.into()),
    }
}

pub async fn vendor_login_page(Extension(flashes): Extension<PendingFlashes>) -> Response {
    page(flashes, json!({ "role": Role::Vendor }))
}

pub async fn vendor_login(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<PhoneLoginForm>,
) -> Result<Response, PageError> {
    let account = match Phone::parse(&form.phone) {
        Ok(phone) => state.db.vendors().login_account(&phone).await?,
        Err(_) => None,
    };

    match check_login(account, form.password).await {
        Ok(account) => {
            let mut claims = session.into_claims();
            claims.sign_in_vendor(account.id, account.name);
            info!(vendor_id = %account.id, "vendor logged in");

            let mut res =
                flash_redirect("/vendor/dashboard", FlashMessage::success("Login successful!"));
            store_session(&mut res, &state, claims)?;
            Ok(res)
        }
        Err(err) => {
            warn!(reason = ?err, "vendor login refused");
            Ok(flash_redirect(
                Role::Vendor.login_path(),
                FlashMessage::error(err.vendor_message()),
            ))
        }
    }
}

pub async fn vendor_logout(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, PageError> {
    let mut claims = session.into_claims();
    claims.sign_out(Role::Vendor);

    let mut res = flash_redirect("/", FlashMessage::success("Logged out successfully!"));
    store_session(&mut res, &state, claims)?;
    Ok(res)
}

/// Verify the password off the runtime, then apply the login rules.
async fn check_login<Id>(
    account: Option<LoginAccount<Id>>,
    password: String,
) -> Result<LoginAccount<Id>, LoginError> {
    let matches = match &account {
        Some(account) => passwords::verify(password, account.password_hash.clone()).await,
        None => false,
    };
    evaluate_login(account, |_| matches)
}
