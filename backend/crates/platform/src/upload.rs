//! File Uploads
//!
//! Validation rules for uploaded files and a local-disk store that
//! writes them under a public prefix. Only folders whose rules are marked
//! [`UploadRules::public`] are served statically; identity documents are
//! read back through [`FileStore::open`] by an admin-only route.

use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::crypto::random_in_range;

/// Upload validation / storage errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Empty file")]
    Empty,

    #[error("Invalid stored path: {0}")]
    InvalidPath(String),

    #[error("Stored file not found: {0}")]
    Missing(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored file read back for download
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// A file received from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Acceptance rules for one kind of upload
#[derive(Debug, Clone, Copy)]
pub struct UploadRules {
    /// Sub-directory under the upload root
    pub folder: &'static str,
    /// Whether the folder may be served without authentication
    pub public: bool,
    /// File name prefix, e.g. `doc`
    pub prefix: &'static str,
    /// Accepted (content type, extension) pairs
    pub accepted: &'static [(&'static str, &'static str)],
    pub max_bytes: usize,
}

impl UploadRules {
    /// Identity documents: JPEG, PNG or PDF up to 5 MiB
    pub const VENDOR_DOCUMENT: UploadRules = UploadRules {
        folder: "vendor-documents",
        public: false,
        prefix: "doc",
        accepted: &[
            ("image/jpeg", "jpg"),
            ("image/jpg", "jpg"),
            ("image/png", "png"),
            ("application/pdf", "pdf"),
        ],
        max_bytes: 5 * 1024 * 1024,
    };

    /// Product images: JPEG, PNG or WebP up to 10 MiB each
    pub const PRODUCT_IMAGE: UploadRules = UploadRules {
        folder: "products",
        public: true,
        prefix: "product",
        accepted: &[
            ("image/jpeg", "jpg"),
            ("image/jpg", "jpg"),
            ("image/png", "png"),
            ("image/webp", "webp"),
        ],
        max_bytes: 10 * 1024 * 1024,
    };

    pub const ALL: [UploadRules; 2] = [UploadRules::VENDOR_DOCUMENT, UploadRules::PRODUCT_IMAGE];

    /// Content type for a stored file name, from the accepted extensions
    pub fn content_type_of(file_name: &str) -> &'static str {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpeg") => "image/jpeg",
            Some(ext) => Self::ALL
                .iter()
                .flat_map(|rules| rules.accepted.iter())
                .find(|(_, e)| *e == ext)
                .map_or("application/octet-stream", |(mime, _)| *mime),
            None => "application/octet-stream",
        }
    }

    /// Check type and size; returns the extension to store under
    ///
    /// The client's own extension is kept when it is one of the accepted
    /// ones (`.jpeg` stays `.jpeg`), otherwise the canonical one is used.
    pub fn validate(&self, file: &UploadedFile) -> Result<String, UploadError> {
        let content_type = file.content_type.trim().to_ascii_lowercase();
        let (_, canonical_ext) = self
            .accepted
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .ok_or_else(|| UploadError::UnsupportedType(content_type.clone()))?;

        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if file.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.bytes.len(),
                max: self.max_bytes,
            });
        }

        let client_ext = file
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let ext = match client_ext {
            Some(ext) if self.accepts_extension(&ext) => ext,
            _ => canonical_ext.to_string(),
        };
        Ok(ext)
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        ext == "jpeg" || self.accepted.iter().any(|(_, e)| *e == ext)
    }

    /// `<prefix>-<millis>-<random>.<ext>`
    pub fn unique_name(&self, ext: &str) -> String {
        format!(
            "{}-{}-{}.{}",
            self.prefix,
            Utc::now().timestamp_millis(),
            random_in_range(0..=999_999_999),
            ext
        )
    }
}

/// Storage backend for uploaded files
#[trait_variant::make(FileStore: Send)]
pub trait LocalFileStore {
    /// Validate and persist; returns the public path (e.g. `/uploads/products/x.png`)
    async fn save(&self, rules: &UploadRules, file: &UploadedFile) -> Result<String, UploadError>;

    /// Read a file previously returned by `save`
    async fn open(&self, public_path: &str) -> Result<StoredFile, UploadError>;

    /// Remove a file previously returned by `save`
    async fn remove(&self, public_path: &str) -> Result<(), UploadError>;
}

/// Writes files below a root directory on local disk
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
    public_prefix: String,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public path back to disk, refusing anything outside the root
    fn resolve(&self, public_path: &str) -> Result<PathBuf, UploadError> {
        let relative = public_path
            .strip_prefix(&self.public_prefix)
            .and_then(|p| p.strip_prefix('/'))
            .ok_or_else(|| UploadError::InvalidPath(public_path.to_string()))?;

        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(UploadError::InvalidPath(public_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl FileStore for DiskFileStore {
    async fn save(&self, rules: &UploadRules, file: &UploadedFile) -> Result<String, UploadError> {
        let ext = rules.validate(file)?;
        let name = rules.unique_name(&ext);

        let dir = self.root.join(rules.folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), &file.bytes).await?;

        tracing::debug!(folder = rules.folder, file = %name, size = file.bytes.len(), "Upload stored");

        Ok(format!("{}/{}/{}", self.public_prefix, rules.folder, name))
    }

    async fn open(&self, public_path: &str) -> Result<StoredFile, UploadError> {
        let path = self.resolve(public_path)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UploadError::Missing(public_path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(StoredFile {
            content_type: UploadRules::content_type_of(public_path),
            bytes: bytes.into(),
        })
    }

    async fn remove(&self, public_path: &str) -> Result<(), UploadError> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
