use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LessonDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl LessonDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonDifficulty::Easy => "easy",
            LessonDifficulty::Medium => "medium",
            LessonDifficulty::Hard => "hard",
        }
    }
}

impl FromStr for LessonDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(LessonDifficulty::Easy),
            "medium" => Ok(LessonDifficulty::Medium),
            "hard" => Ok(LessonDifficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub grade: i32,
    pub duration: i32,
    pub difficulty: String,
    pub rating: f64,
    pub review_count: i32,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
