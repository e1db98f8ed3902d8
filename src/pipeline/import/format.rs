use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImportError;

pub const MAX_UPLOAD_MB: u64 = 10;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;

/// Prescription upload formats we accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFormat {
    Jpeg,
    Png,
    Pdf,
}

impl UploadFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Extension used for the stored copy.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        match self {
            Self::Jpeg => ext == "jpg" || ext == "jpeg",
            Self::Png => ext == "png",
            Self::Pdf => ext == "pdf",
        }
    }

    fn from_magic(header: &[u8]) -> Option<Self> {
        match header {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(Self::Png),
            [0x25, 0x50, 0x44, 0x46, ..] => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Validate an upload by size, magic bytes and declared extension.
/// Content decides the format; the extension must agree with it.
pub fn detect_upload_format(file_name: &str, bytes: &[u8]) -> Result<UploadFormat, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let size = bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(ImportError::FileTooLarge {
            size_mb: size as f64 / (1024.0 * 1024.0),
            max_mb: MAX_UPLOAD_MB,
        });
    }

    let format = UploadFormat::from_magic(&bytes[..bytes.len().min(8)])
        .ok_or_else(|| ImportError::UnsupportedFormat(file_name.to_string()))?;

    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !format.accepts_extension(&ext) {
        tracing::warn!(
            file_name,
            detected = format.mime_type(),
            "Upload extension does not match content"
        );
        return Err(ImportError::UnsupportedFormat(file_name.to_string()));
    }

    Ok(format)
}
