use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub lesson_id: i64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFeedbackRequest {
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: Option<f64>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyFeedbackQuery {
    pub lesson_id: Option<i64>,
}
