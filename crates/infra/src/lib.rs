//! Infrastructure layer: configuration, SQLite storage, seed data and
//! uploaded-file storage.

pub mod config;
pub mod db;
pub mod seed;
pub mod stores;
pub mod uploads;

pub use config::Config;
pub use db::{Database, StoreError, StoreResult};
pub use uploads::{ALLOWED_EXTENSIONS, LocalUploadStore, UploadError, UploadStore, allowed_file};
