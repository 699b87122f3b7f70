use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub time_spent: i32,
    /// JSON array of section ids, stored as text.
    pub completed_sections: Option<String>,
    pub quiz_score: Option<f64>,
    pub average_score: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed: DateTime<Utc>,
}

impl StudentProgress {
    pub fn sections(&self) -> Vec<i64> {
        self.completed_sections
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}
