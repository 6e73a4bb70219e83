//! Image uploads from the admin editors.
//!
//! Editors send the file as a data URL. The bytes land in a bucket directory
//! under the upload root and are served back from `/storage`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use serde::Deserialize;

pub const DEFAULT_BUCKET: &str = "blog-images";
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("image data is not a base64 data url")]
    InvalidDataUrl,
    #[error("Please select an image file (got {0})")]
    NotAnImage(String),
    #[error("Image must be smaller than 10MB")]
    TooLarge(usize),
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("invalid bucket name: {0}")]
    InvalidBucket(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub image_data: String,
    pub file_name: String,
    pub bucket: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Splits `data:<mime>;base64,<payload>` and decodes the payload.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, UploadError> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or(UploadError::InvalidDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(UploadError::InvalidDataUrl)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(UploadError::InvalidDataUrl)?
        .to_string();

    if !mime_type.starts_with("image/") {
        return Err(UploadError::NotAnImage(mime_type));
    }

    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge(bytes.len()));
    }

    Ok(DecodedImage { mime_type, bytes })
}

/// `<millis>-<random>.<ext>`, keeping the extension of `original`.
pub fn unique_file_name(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string());
    format!(
        "{}-{:08x}.{}",
        Utc::now().timestamp_millis(),
        OsRng.next_u32(),
        ext
    )
}

fn valid_bucket(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Filesystem-backed object store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/storage/{bucket}/{name}", self.public_base_url)
    }

    pub async fn put(&self, bucket: &str, name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if !valid_bucket(bucket) {
            return Err(UploadError::InvalidBucket(bucket.to_string()));
        }
        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), bytes).await?;
        Ok(self.public_url(bucket, name))
    }

    /// Validates and stores one upload, returning its public URL.
    pub async fn upload(&self, request: &UploadRequest) -> Result<String, UploadError> {
        let image = decode_data_url(&request.image_data)?;
        let bucket = request
            .bucket
            .as_deref()
            .map(str::trim)
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or(DEFAULT_BUCKET);
        let name = unique_file_name(&request.file_name);
        let url = self.put(bucket, &name, &image.bytes).await?;
        log::info!("Stored {} bytes ({}) as {url}", image.bytes.len(), image.mime_type);
        Ok(url)
    }
}
