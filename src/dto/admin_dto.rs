use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use validator::Validate;

use super::validate_media_url;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(range(min = 6, max = 9))]
    pub grade: Option<i32>,
    #[validate(length(max = 20))]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 6, max = 9))]
    pub grade: Option<i32>,
    #[validate(length(max = 20))]
    pub class_name: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgressResult {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub class_name: Option<String>,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub quiz_score: Option<f64>,
    pub average_score: Option<f64>,
    pub time_spent: i32,
    pub last_accessed: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttemptResult {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub lesson_title: String,
    pub score: f64,
    pub points_earned: f64,
    pub total_points: f64,
    pub passed: bool,
    pub time_spent: i32,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_lessons: i64,
    pub total_quiz_attempts: i64,
    pub total_feedback: i64,
    pub total_video_views: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub video_type: String,
    #[validate(length(max = 500), custom(function = "validate_media_url"))]
    pub video_url: String,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    pub timeline: Option<JsonValue>,
    pub key_points: Option<JsonValue>,
    pub attachments: Option<JsonValue>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub video_type: Option<String>,
    #[validate(length(max = 500), custom(function = "validate_media_url"))]
    pub video_url: Option<String>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    pub timeline: Option<JsonValue>,
    pub key_points: Option<JsonValue>,
    pub attachments: Option<JsonValue>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(length(min = 1, max = 50))]
    pub section_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content_html: String,
    #[serde(default)]
    pub order: i32,
    pub geogebra_embed: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContentRequest {
    #[validate(length(min = 1, max = 50))]
    pub section_type: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content_html: Option<String>,
    pub order: Option<i32>,
    pub geogebra_embed: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_title: String,
    pub site_description: String,
    pub admin_email: String,
    pub allow_registration: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSiteSettingsRequest {
    #[validate(length(min = 1, max = 200))]
    pub site_title: Option<String>,
    #[validate(length(max = 1000))]
    pub site_description: Option<String>,
    #[validate(email)]
    pub admin_email: Option<String>,
    pub allow_registration: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_url_must_be_http_or_upload_path() {
        let mut request: CreateVideoRequest = serde_json::from_value(json!({
            "title": "Pythagoras",
            "video_type": "youtube",
            "video_url": "https://youtu.be/abc"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        request.video_url = "javascript:alert(1)".into();
        assert!(request.validate().is_err());
    }
}
