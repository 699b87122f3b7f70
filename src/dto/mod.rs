pub mod admin_dto;
pub mod auth_dto;
pub mod content_dto;
pub mod feedback_dto;
pub mod lesson_dto;
pub mod progress_dto;
pub mod quiz_dto;
pub mod upload_dto;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Absolute http(s) URL, or a path under the uploads mount.
pub fn validate_media_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("/uploads/") {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("invalid_media_url")),
    }
}
