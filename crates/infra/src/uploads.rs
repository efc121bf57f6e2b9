//! Storage for uploaded files (registration documents, product images,
//! profile photos).
//!
//! Files are stored flat in one directory. Callers keep the relative path
//! `uploads/<name>` in the database; it maps to `/static/uploads/<name>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Extensions accepted for any upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "pdf", "doc", "docx"];

const RELATIVE_PREFIX: &str = "uploads/";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid file type")]
    DisallowedType,

    #[error("invalid upload path: {0}")]
    InvalidPath(String),

    #[error("upload io error: {0}")]
    Io(#[from] std::io::Error),
}

/// True when the file name carries an allowed extension.
pub fn allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`, dropping any
/// directory part and leading dots.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store `bytes` under a fresh name; returns the relative path.
    async fn save(&self, prefix: &str, original_name: &str, bytes: &[u8]) -> Result<String, UploadError>;

    /// Remove a stored file by relative path.
    async fn delete(&self, relative_path: &str) -> Result<(), UploadError>;

    /// Filesystem location of a stored file name (the part after `uploads/`).
    fn resolve(&self, file_name: &str) -> Result<PathBuf, UploadError>;

    /// Filesystem location of a stored relative path.
    fn resolve_relative(&self, relative_path: &str) -> Result<PathBuf, UploadError> {
        let name = relative_path
            .strip_prefix(RELATIVE_PREFIX)
            .ok_or_else(|| UploadError::InvalidPath(relative_path.to_string()))?;
        self.resolve(name)
    }
}

/// Uploads kept in a local directory.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    dir: PathBuf,
}

impl LocalUploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(&self, prefix: &str, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if !allowed_file(original_name) {
            return Err(UploadError::DisallowedType);
        }
        let name = format!("{prefix}_{}_{}", Uuid::now_v7().simple(), sanitize_file_name(original_name));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        debug!(file = %name, size = bytes.len(), "upload stored");

        Ok(format!("{RELATIVE_PREFIX}{name}"))
    }

    async fn delete(&self, relative_path: &str) -> Result<(), UploadError> {
        let path = self.resolve_relative(relative_path)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        let safe = !file_name.is_empty()
            && !file_name.starts_with('.')
            && !file_name.contains(['/', '\\', '\0'])
            && !file_name.contains("..");
        if !safe {
            return Err(UploadError::InvalidPath(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(allowed_file("licence.PDF"));
        assert!(allowed_file("photo.jpeg"));
        assert!(!allowed_file("script.exe"));
        assert!(!allowed_file("no_extension"));
    }

    #[test]
    fn sanitize_drops_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\my id card.pdf"), "my_id_card.pdf");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn resolve_refuses_traversal() {
        let store = LocalUploadStore::new("/srv/uploads");
        assert!(store.resolve("../secret.txt").is_err());
        assert!(store.resolve("a/b.png").is_err());
        assert!(store.resolve(".env").is_err());
        assert!(store.resolve_relative("static/x.png").is_err());
        assert_eq!(
            store.resolve_relative("uploads/id_proof_1_card.pdf").unwrap(),
            PathBuf::from("/srv/uploads/id_proof_1_card.pdf")
        );
    }

    #[tokio::test]
    async fn save_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path().join("uploads"));

        let relative = store.save("product", "Fresh Tomatoes.png", b"png-bytes").await.unwrap();
        assert!(relative.starts_with("uploads/product_"));
        assert!(relative.ends_with("_Fresh_Tomatoes.png"));

        let path = store.resolve_relative(&relative).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");

        store.delete(&relative).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn disallowed_type_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path());
        let err = store.save("doc", "virus.exe", b"x").await.unwrap_err();
        assert!(matches!(err, UploadError::DisallowedType));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
