use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GeogebraFigure {
    pub id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub ggb_base64: String,
    pub width: i32,
    pub height: i32,
    pub show_toolbar: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
