use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn default_width() -> i32 {
    800
}

fn default_height() -> i32 {
    600
}

/// GeoGebra `.ggb` files are embedded as base64 text; reject anything that does not decode.
pub fn validate_ggb_base64(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ValidationError::new("empty_ggb_base64"));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_ggb_base64"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGeogebraRequest {
    pub lesson_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(custom(function = "validate_ggb_base64"))]
    pub ggb_base64: String,
    #[serde(default = "default_width")]
    #[validate(range(min = 100, max = 4000))]
    pub width: i32,
    #[serde(default = "default_height")]
    #[validate(range(min = 100, max = 4000))]
    pub height: i32,
    #[serde(default)]
    pub show_toolbar: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGeogebraRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_ggb_base64"))]
    pub ggb_base64: Option<String>,
    #[validate(range(min = 100, max = 4000))]
    pub width: Option<i32>,
    #[validate(range(min = 100, max = 4000))]
    pub height: Option<i32>,
    pub show_toolbar: Option<bool>,
}
