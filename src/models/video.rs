use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_type: String,
    pub video_url: String,
    pub duration: Option<i32>,
    pub timeline: Option<JsonValue>,
    pub key_points: Option<JsonValue>,
    pub attachments: Option<JsonValue>,
    pub views: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
