use crate::dto::upload_dto::UploadResponse;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Video,
}

impl UploadKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Image => "images",
            UploadKind::Video => "videos",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => &["jpg", "jpeg", "png", "gif", "webp"],
            UploadKind::Video => &["mp4", "webm", "mov", "avi"],
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "images" => Some(UploadKind::Image),
            "videos" => Some(UploadKind::Video),
            _ => None,
        }
    }
}

/// Checks extension and size, returning the lower-cased extension to store under.
pub fn validate_upload(kind: UploadKind, filename: &str, data: &[u8], max_size: usize) -> Result<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let allowed = kind.allowed_extensions();
    if !allowed.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!(
            "Invalid file type. Allowed: {}",
            allowed.join(", ")
        )));
    }

    if data.len() > max_size {
        return Err(Error::BadRequest(format!(
            "File too large. Max size: {}MB",
            megabytes(max_size)
        )));
    }

    if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("Invalid JPEG file content".into()));
    }
    if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("Invalid PNG file content".into()));
    }

    Ok(ext)
}

/// Size in MB rounded to two places.
fn megabytes(bytes: usize) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Writes the file, removing any partial output if the write fails.
async fn write_stored_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, data).await {
        tracing::error!(path = %path.display(), error = %e, "failed to write upload");
        let _ = fs::remove_file(path).await;
        return Err(Error::Internal(format!("Failed to save file: {}", e)));
    }
    Ok(())
}

/// Plain file names only: no separators, no parent references.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

#[derive(Clone)]
pub struct UploadService {
    root: PathBuf,
    max_image_size: usize,
    max_video_size: usize,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, max_image_size: usize, max_video_size: usize) -> Self {
        Self {
            root: root.into(),
            max_image_size,
            max_video_size,
        }
    }

    pub fn max_size(&self, kind: UploadKind) -> usize {
        match kind {
            UploadKind::Image => self.max_image_size,
            UploadKind::Video => self.max_video_size,
        }
    }

    pub async fn save(&self, kind: UploadKind, filename: &str, data: Bytes) -> Result<UploadResponse> {
        let ext = match validate_upload(kind, filename, &data, self.max_size(kind)) {
            Ok(ext) => ext,
            Err(e) => {
                tracing::warn!(filename, kind = kind.dir_name(), error = %e, "upload rejected");
                return Err(e);
            }
        };

        let dir = self.root.join(kind.dir_name());
        fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        write_stored_file(&dir.join(&stored_name), &data).await?;

        tracing::info!(file = %stored_name, size = data.len(), "file uploaded");
        Ok(UploadResponse {
            success: true,
            url: format!("/uploads/{}/{}", kind.dir_name(), stored_name),
            filename: stored_name,
            size: data.len(),
        })
    }

    pub async fn delete(&self, file_type: &str, filename: &str) -> Result<()> {
        let kind = UploadKind::from_dir_name(file_type)
            .ok_or_else(|| Error::BadRequest("Invalid file type".to_string()))?;
        if !is_safe_filename(filename) {
            return Err(Error::BadRequest("Invalid filename".to_string()));
        }

        let path = self.root.join(kind.dir_name()).join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(file = filename, "file deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound("File not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn extension_allow_list() {
        assert_eq!(validate_upload(UploadKind::Image, "A.PNG", PNG, 1024).unwrap(), "png");
        assert_eq!(validate_upload(UploadKind::Video, "clip.mp4", b"....", 1024).unwrap(), "mp4");
        let err = validate_upload(UploadKind::Image, "clip.mp4", b"....", 1024).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Invalid file type. Allowed: jpg, jpeg, png, gif, webp"
        );
        assert!(validate_upload(UploadKind::Image, "noext", b"x", 1024).is_err());
    }

    #[test]
    fn size_ceiling() {
        let data = vec![0u8; 2 * 1024 * 1024 + 1];
        let err = validate_upload(UploadKind::Video, "big.webm", &data, 2 * 1024 * 1024).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: File too large. Max size: 2MB");
    }

    #[test]
    fn fractional_size_ceiling_is_not_truncated() {
        let limit = 5 * 1024 * 1024 + 512 * 1024;
        let data = vec![0u8; limit + 1];
        let err = validate_upload(UploadKind::Video, "big.mp4", &data, limit).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: File too large. Max size: 5.5MB");
        assert_eq!(megabytes(10 * 1024 * 1024).to_string(), "10");
    }

    #[tokio::test]
    async fn failed_write_leaves_no_file() {
        let missing = std::env::temp_dir()
            .join(format!("upload-missing-{}", uuid::Uuid::new_v4()))
            .join("x.png");
        let result = write_stored_file(&missing, PNG).await;
        assert!(matches!(result, Err(Error::Internal(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn png_signature_checked() {
        assert!(validate_upload(UploadKind::Image, "x.png", b"GIF89a", 1024).is_err());
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let big = vec![0u8; 2048];
        tokio_test::assert_err!(validate_upload(UploadKind::Video, "clip.mp4", &big, 1024));
    }

    #[test]
    fn unsafe_filenames() {
        assert!(is_safe_filename("abc.png"));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
        assert!(!is_safe_filename(""));
    }

    #[tokio::test]
    async fn save_then_delete() {
        let root = std::env::temp_dir().join(format!("upload-test-{}", uuid::Uuid::new_v4()));
        let service = UploadService::new(&root, 1024, 1024);

        let saved = service
            .save(UploadKind::Image, "dot.png", Bytes::from_static(PNG))
            .await
            .unwrap();
        assert!(saved.success);
        assert!(saved.filename.ends_with(".png"));
        assert_eq!(saved.url, format!("/uploads/images/{}", saved.filename));
        assert_eq!(saved.size, PNG.len());
        assert!(root.join("images").join(&saved.filename).exists());

        tokio_test::assert_ok!(service.delete("images", &saved.filename).await);
        assert!(matches!(
            service.delete("images", &saved.filename).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.delete("documents", "x.png").await,
            Err(Error::BadRequest(_))
        ));

        let _ = std::fs::remove_dir_all(root);
    }
}
