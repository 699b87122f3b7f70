use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentSection {
    pub id: i64,
    pub section_type: String,
    pub title: String,
    pub content_html: String,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub geogebra_embed: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
