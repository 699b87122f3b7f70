use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::student_progress::StudentProgress;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    pub progress_percentage: f64,
    pub completed_sections: Option<Vec<i64>>,
    #[validate(range(min = 0))]
    pub time_spent: Option<i32>,
}

/// Query-string form sent by the web clients: `?progress_percentage=40&completed_sections=1,2&time_spent=30`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressQuery {
    pub progress_percentage: Option<f64>,
    pub completed_sections: Option<String>,
    pub time_spent: Option<i32>,
}

impl ProgressQuery {
    /// `None` when the query carries no percentage, so the caller can fall back to a JSON body.
    pub fn into_request(self) -> Option<UpdateProgressRequest> {
        let progress_percentage = self.progress_percentage?;
        Some(UpdateProgressRequest {
            progress_percentage,
            completed_sections: self.completed_sections.as_deref().and_then(parse_sections),
            time_spent: self.time_spent,
        })
    }
}

/// Comma-separated section ids. Blank entries are skipped; any non-numeric id drops the whole list.
pub fn parse_sections(raw: &str) -> Option<Vec<i64>> {
    if raw.is_empty() {
        return None;
    }
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().ok())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub message: String,
    pub lesson_id: i64,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_sections: Vec<i64>,
    pub time_spent: i32,
}

impl From<StudentProgress> for ProgressResponse {
    fn from(progress: StudentProgress) -> Self {
        let completed_sections = progress.sections();
        Self {
            message: "Progress updated successfully".to_string(),
            lesson_id: progress.lesson_id,
            progress_percentage: progress.progress_percentage,
            is_completed: progress.is_completed,
            completed_at: progress.completed_at,
            completed_sections,
            time_spent: progress.time_spent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_parse_from_comma_separated_text() {
        assert_eq!(parse_sections("1,2, 3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_sections("4,,5,"), Some(vec![4, 5]));
        assert_eq!(parse_sections(""), None);
        assert_eq!(parse_sections("1,x,3"), None);
    }

    #[test]
    fn query_without_percentage_defers_to_body() {
        let query = ProgressQuery {
            progress_percentage: None,
            completed_sections: Some("1".into()),
            time_spent: Some(5),
        };
        assert!(query.into_request().is_none());

        let query = ProgressQuery {
            progress_percentage: Some(40.0),
            completed_sections: Some("1,2".into()),
            time_spent: Some(30),
        };
        let request = query.into_request().unwrap();
        assert_eq!(request.progress_percentage, 40.0);
        assert_eq!(request.completed_sections, Some(vec![1, 2]));
        assert_eq!(request.time_spent, Some(30));
    }
}
