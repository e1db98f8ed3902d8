use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ImportError, UploadFormat};

/// URL prefix under which stored prescriptions are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/prescriptions";

#[derive(Debug, Clone, PartialEq)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub image_url: String,
    pub format: UploadFormat,
}

/// Write validated upload bytes to `uploads_dir` as
/// `prescription-<millis>-<random>.<ext>`.
pub fn stage_upload(
    uploads_dir: &Path,
    bytes: &[u8],
    format: UploadFormat,
    now: DateTime<Utc>,
) -> Result<StagedUpload, ImportError> {
    std::fs::create_dir_all(uploads_dir)?;

    let file_name = format!(
        "prescription-{}-{}.{}",
        now.timestamp_millis(),
        Uuid::new_v4().simple(),
        format.extension()
    );
    let path = uploads_dir.join(&file_name);
    std::fs::write(&path, bytes)?;

    tracing::debug!(
        file = %file_name,
        size = bytes.len(),
        mime = format.mime_type(),
        "Prescription upload staged"
    );

    Ok(StagedUpload {
        path,
        image_url: format!("{UPLOAD_URL_PREFIX}/{file_name}"),
        format,
    })
}

/// Remove a staged upload after a failed import. Missing files are fine.
pub fn remove_staged(staged: &StagedUpload) -> Result<(), ImportError> {
    match std::fs::remove_file(&staged.path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stage_writes_bytes_with_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let staged = stage_upload(dir.path(), b"%PDF-1.4", UploadFormat::Pdf, now).unwrap();

        let name = staged.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("prescription-1700000000123-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(staged.image_url, format!("/uploads/prescriptions/{name}"));
        assert_eq!(std::fs::read(&staged.path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn two_uploads_same_millisecond_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = stage_upload(dir.path(), b"a", UploadFormat::Png, now).unwrap();
        let b = stage_upload(dir.path(), b"b", UploadFormat::Png, now).unwrap();
        assert_ne!(a.path, b.path);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads").join("prescriptions");
        let staged = stage_upload(&nested, b"x", UploadFormat::Jpeg, Utc::now()).unwrap();
        assert!(staged.path.exists());
    }

    #[test]
    fn remove_staged_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(dir.path(), b"x", UploadFormat::Png, Utc::now()).unwrap();
        remove_staged(&staged).unwrap();
        assert!(!staged.path.exists());
        remove_staged(&staged).unwrap();
    }
}
