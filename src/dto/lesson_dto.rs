use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lesson::{Lesson, LessonDifficulty};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 250))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub thumbnail: Option<String>,
    #[validate(length(max = 500))]
    pub video_url: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 6, max = 9))]
    pub grade: i32,
    #[validate(range(min = 1))]
    pub duration: i32,
    #[serde(default)]
    pub difficulty: LessonDifficulty,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 250))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub thumbnail: Option<String>,
    #[validate(length(max = 500))]
    pub video_url: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 6, max = 9))]
    pub grade: Option<i32>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    pub difficulty: Option<LessonDifficulty>,
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LessonListQuery {
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 6, max = 9))]
    pub grade: Option<i32>,
    pub difficulty: Option<LessonDifficulty>,
}

impl LessonListQuery {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100)
    }
}

/// A published lesson as seen by one student, with that student's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLessonResponse {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub progress: f64,
    pub is_completed: bool,
    pub completed_sections: Vec<i64>,
}
