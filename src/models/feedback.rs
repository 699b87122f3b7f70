use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feedback joined with the author and lesson it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackDetail {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub lesson_title: Option<String>,
}
