use crate::models::quiz::{QuestionWithAnswers, QuizAnswer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradedQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub user_answer: JsonValue,
    pub correct_answer_id: Option<i64>,
    pub correct_answer_text: Option<String>,
    pub is_correct: bool,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub points_earned: f64,
    pub total_points: f64,
    pub score: f64,
    pub passed: bool,
    pub details: Vec<GradedQuestion>,
}

pub struct GradingService;

impl GradingService {
    pub fn grade(
        questions: &[QuestionWithAnswers],
        answers: &HashMap<i64, JsonValue>,
        passing_score: f64,
    ) -> GradeOutcome {
        let mut total_points = 0.0;
        let mut points_earned = 0.0;
        let mut details = Vec::with_capacity(questions.len());

        for q in questions {
            let question = &q.question;
            total_points += question.points;

            let submitted = answers.get(&question.id).cloned().unwrap_or(JsonValue::Null);
            let reference = q.reference_answer();
            let is_correct = reference
                .map(|r| Self::matches(q, r, &submitted))
                .unwrap_or(false);

            if is_correct {
                points_earned += question.points;
            }

            details.push(GradedQuestion {
                question_id: question.id,
                question_text: question.question_text.clone(),
                user_answer: submitted,
                correct_answer_id: reference.map(|r| r.id),
                correct_answer_text: reference.map(|r| r.answer_text.clone()),
                is_correct,
                points: if is_correct { question.points } else { 0.0 },
            });
        }

        let score = Self::score(points_earned, total_points);
        GradeOutcome {
            points_earned,
            total_points,
            score,
            passed: score >= passing_score,
            details,
        }
    }

    pub fn score(points_earned: f64, total_points: f64) -> f64 {
        if total_points > 0.0 {
            points_earned / total_points * 100.0
        } else {
            0.0
        }
    }

    fn matches(q: &QuestionWithAnswers, reference: &QuizAnswer, submitted: &JsonValue) -> bool {
        if q.question.kind().is_choice() {
            Self::answer_id(submitted) == Some(reference.id)
        } else {
            match Self::answer_text(submitted) {
                Some(text) if !text.is_empty() => text == normalize(&reference.answer_text),
                _ => false,
            }
        }
    }

    fn answer_id(value: &JsonValue) -> Option<i64> {
        match value {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn answer_text(value: &JsonValue) -> Option<String> {
        match value {
            JsonValue::String(s) => Some(normalize(s)),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
