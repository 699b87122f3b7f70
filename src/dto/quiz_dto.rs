use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use validator::Validate;

use crate::models::quiz::{QuestionType, QuizWithQuestions};
use crate::models::quiz_attempt::QuizAttempt;
use crate::services::grading_service::GradedQuestion;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerPayload {
    #[validate(length(min = 1))]
    pub answer_text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionPayload {
    #[validate(length(min = 1))]
    pub question_text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default = "default_points")]
    #[validate(range(min = 0.0))]
    pub points: f64,
    #[serde(default)]
    pub order: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub answers: Vec<AnswerPayload>,
}

fn default_points() -> f64 {
    1.0
}

fn default_passing_score() -> f64 {
    60.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub lesson_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    #[serde(default = "default_passing_score")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default = "default_true")]
    pub show_answers: bool,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: Option<f64>,
    pub is_active: Option<bool>,
    pub shuffle_questions: Option<bool>,
    pub show_answers: Option<bool>,
    /// When present, replaces every question of the quiz.
    #[validate(nested)]
    pub questions: Option<Vec<QuestionPayload>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizListQuery {
    pub lesson_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptListQuery {
    pub quiz_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAnswerView {
    pub id: i64,
    pub answer_text: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentQuestionView {
    pub id: i64,
    pub question_text: String,
    pub question_type: String,
    pub points: f64,
    pub order: i32,
    pub image_url: Option<String>,
    pub answers: Vec<StudentAnswerView>,
}

/// Quiz as served to a student: answer options without correctness flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentQuizView {
    pub id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub passing_score: f64,
    pub shuffle_questions: bool,
    pub questions: Vec<StudentQuestionView>,
}

impl From<QuizWithQuestions> for StudentQuizView {
    fn from(full: QuizWithQuestions) -> Self {
        let questions = full
            .questions
            .into_iter()
            .map(|q| StudentQuestionView {
                id: q.question.id,
                question_text: q.question.question_text,
                question_type: q.question.question_type,
                points: q.question.points,
                order: q.question.display_order,
                image_url: q.question.image_url,
                answers: q
                    .answers
                    .into_iter()
                    .map(|a| StudentAnswerView {
                        id: a.id,
                        answer_text: a.answer_text,
                        order: a.display_order,
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: full.quiz.id,
            lesson_id: full.quiz.lesson_id,
            title: full.quiz.title,
            description: full.quiz.description,
            duration: full.quiz.duration,
            passing_score: full.quiz.passing_score,
            shuffle_questions: full.quiz.shuffle_questions,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    /// Keyed by question id. Values are answer ids for choice questions and text otherwise.
    #[serde(default)]
    pub answers: HashMap<String, JsonValue>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_spent: i32,
}

impl SubmitQuizRequest {
    /// Keys that are not question ids are ignored.
    pub fn answers_by_question(&self) -> HashMap<i64, JsonValue> {
        self.answers
            .iter()
            .filter_map(|(key, value)| key.trim().parse::<i64>().ok().map(|id| (id, value.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizResponse {
    pub attempt: QuizAttempt,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<GradedQuestion>>,
}
