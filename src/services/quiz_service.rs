use crate::dto::quiz_dto::{
    CreateQuizRequest, QuestionPayload, StudentQuizView, SubmitQuizRequest, SubmitQuizResponse,
    UpdateQuizRequest,
};
use crate::error::{Error, Result};
use crate::models::quiz::{QuestionWithAnswers, Quiz, QuizAnswer, QuizQuestion, QuizWithQuestions};
use crate::models::quiz_attempt::QuizAttempt;
use crate::services::grading_service::GradingService;
use crate::services::progress_service::ProgressService;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateQuizRequest) -> Result<QuizWithQuestions> {
        let mut tx = self.pool.begin().await?;

        let lesson: Option<i64> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(payload.lesson_id)
            .fetch_optional(&mut *tx)
            .await?;
        if lesson.is_none() {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (
                lesson_id, title, description, duration, passing_score,
                is_active, shuffle_questions, show_answers
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.lesson_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.duration)
        .bind(payload.passing_score)
        .bind(payload.is_active)
        .bind(payload.shuffle_questions)
        .bind(payload.show_answers)
        .fetch_one(&mut *tx)
        .await?;

        let questions = insert_questions(&mut tx, quiz.id, &payload.questions).await?;
        tx.commit().await?;

        tracing::info!(quiz_id = quiz.id, questions = questions.len(), "quiz created");
        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn list(&self, lesson_id: Option<i64>) -> Result<Vec<QuizWithQuestions>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT * FROM quizzes
            WHERE ($1::BIGINT IS NULL OR lesson_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
        let mut questions = self.load_questions(&ids).await?;

        Ok(quizzes
            .into_iter()
            .map(|quiz| {
                let questions = questions.remove(&quiz.id).unwrap_or_default();
                QuizWithQuestions { quiz, questions }
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<QuizWithQuestions> {
        let quiz = self.get_quiz(id).await?;
        let questions = self.load_questions(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(QuizWithQuestions { quiz, questions })
    }

    async fn get_quiz(&self, id: i64) -> Result<Quiz> {
        sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))
    }

    /// Questions and their answers for several quizzes in two queries, keyed by quiz id.
    async fn load_questions(&self, quiz_ids: &[i64]) -> Result<HashMap<i64, Vec<QuestionWithAnswers>>> {
        if quiz_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT * FROM quiz_questions WHERE quiz_id = ANY($1) ORDER BY display_order, id",
        )
        .bind(quiz_ids)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let answers = sqlx::query_as::<_, QuizAnswer>(
            "SELECT * FROM quiz_answers WHERE question_id = ANY($1) ORDER BY display_order, id",
        )
        .bind(&question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut answers_by_question: HashMap<i64, Vec<QuizAnswer>> = HashMap::new();
        for answer in answers {
            answers_by_question
                .entry(answer.question_id)
                .or_default()
                .push(answer);
        }

        let mut grouped: HashMap<i64, Vec<QuestionWithAnswers>> = HashMap::new();
        for question in questions {
            let answers = answers_by_question.remove(&question.id).unwrap_or_default();
            grouped
                .entry(question.quiz_id)
                .or_default()
                .push(QuestionWithAnswers { question, answers });
        }
        Ok(grouped)
    }

    pub async fn update(&self, id: i64, payload: UpdateQuizRequest) -> Result<QuizWithQuestions> {
        let mut tx = self.pool.begin().await?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                duration = COALESCE($4, duration),
                passing_score = COALESCE($5, passing_score),
                is_active = COALESCE($6, is_active),
                shuffle_questions = COALESCE($7, shuffle_questions),
                show_answers = COALESCE($8, show_answers),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.duration)
        .bind(payload.passing_score)
        .bind(payload.is_active)
        .bind(payload.shuffle_questions)
        .bind(payload.show_answers)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

        if let Some(questions) = payload.questions.as_deref() {
            sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_questions(&mut tx, id, questions).await?;
        }
        tx.commit().await?;

        tracing::info!(quiz_id = quiz.id, "quiz updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz not found".to_string()));
        }
        Ok(())
    }

    /// First active quiz of a lesson, without correctness flags.
    pub async fn for_lesson(&self, lesson_id: i64) -> Result<StudentQuizView> {
        let quiz_id: i64 = sqlx::query_scalar(
            r#"
            SELECT id FROM quizzes
            WHERE lesson_id = $1 AND is_active
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("No active quiz found for this lesson".to_string()))?;

        let mut full = self.get(quiz_id).await?;
        if full.quiz.shuffle_questions {
            shuffle(&mut full);
        }
        Ok(StudentQuizView::from(full))
    }

    pub async fn submit(
        &self,
        user_id: i64,
        quiz_id: i64,
        payload: SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse> {
        let full = self.get(quiz_id).await?;
        let answers = payload.answers_by_question();
        let outcome =
            GradingService::grade(&full.questions, &answers, full.quiz.passing_score);

        let submitted_at = Utc::now();
        let started_at = submitted_at - Duration::seconds(i64::from(payload.time_spent));
        let raw_answers = serde_json::to_value(&payload.answers)?;

        let mut tx = self.pool.begin().await?;
        let attempt = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (
                user_id, quiz_id, score, points_earned, total_points,
                answers, started_at, submitted_at, time_spent, is_completed
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(outcome.score)
        .bind(outcome.points_earned)
        .bind(outcome.total_points)
        .bind(raw_answers)
        .bind(started_at)
        .bind(submitted_at)
        .bind(payload.time_spent)
        .fetch_one(&mut *tx)
        .await?;

        if outcome.passed {
            ProgressService::record_quiz_pass(&mut tx, user_id, full.quiz.lesson_id, outcome.score)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            user_id,
            quiz_id,
            attempt_id = attempt.id,
            score = outcome.score,
            passed = outcome.passed,
            "quiz submitted"
        );

        Ok(SubmitQuizResponse {
            attempt,
            passed: outcome.passed,
            correct_answers: full.quiz.show_answers.then_some(outcome.details),
        })
    }

    pub async fn my_attempts(&self, user_id: i64, quiz_id: Option<i64>) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            r#"
            SELECT * FROM quiz_attempts
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR quiz_id = $2)
            ORDER BY submitted_at DESC NULLS LAST, id DESC
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    /// Another user's attempt is reported as missing.
    pub async fn attempt(&self, user_id: i64, attempt_id: i64) -> Result<QuizAttempt> {
        sqlx::query_as::<_, QuizAttempt>(
            "SELECT * FROM quiz_attempts WHERE id = $1 AND user_id = $2",
        )
        .bind(attempt_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))
    }

    pub async fn best_attempt(&self, user_id: i64, quiz_id: i64) -> Result<QuizAttempt> {
        sqlx::query_as::<_, QuizAttempt>(
            r#"
            SELECT * FROM quiz_attempts
            WHERE user_id = $1 AND quiz_id = $2
            ORDER BY score DESC, submitted_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("No attempts found for this quiz".to_string()))
    }
}

async fn insert_questions(
    conn: &mut PgConnection,
    quiz_id: i64,
    payloads: &[QuestionPayload],
) -> Result<Vec<QuestionWithAnswers>> {
    let mut created = Vec::with_capacity(payloads.len());

    for payload in payloads {
        let question = sqlx::query_as::<_, QuizQuestion>(
            r#"
            INSERT INTO quiz_questions (
                quiz_id, question_text, question_type, points, display_order, image_url
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(&payload.question_text)
        .bind(payload.question_type.as_str())
        .bind(payload.points)
        .bind(payload.order)
        .bind(&payload.image_url)
        .fetch_one(&mut *conn)
        .await?;

        let mut answers = Vec::with_capacity(payload.answers.len());
        for answer in &payload.answers {
            let row = sqlx::query_as::<_, QuizAnswer>(
                r#"
                INSERT INTO quiz_answers (question_id, answer_text, is_correct, display_order)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(question.id)
            .bind(&answer.answer_text)
            .bind(answer.is_correct)
            .bind(answer.order)
            .fetch_one(&mut *conn)
            .await?;
            answers.push(row);
        }

        created.push(QuestionWithAnswers { question, answers });
    }

    Ok(created)
}

/// Display order only; grading matches by id and text, never by position.
fn shuffle(full: &mut QuizWithQuestions) {
    let mut rng = rand::thread_rng();
    full.questions.shuffle(&mut rng);
    for question in &mut full.questions {
        question.answers.shuffle(&mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(n: i64) -> QuizWithQuestions {
        let now = Utc::now();
        let questions = (1..=n)
            .map(|id| QuestionWithAnswers {
                question: QuizQuestion {
                    id,
                    quiz_id: 1,
                    question_text: format!("q{}", id),
                    question_type: "multiple_choice".into(),
                    points: 1.0,
                    display_order: id as i32,
                    image_url: None,
                    created_at: now,
                    updated_at: now,
                },
                answers: (0..4)
                    .map(|k| QuizAnswer {
                        id: id * 10 + k,
                        question_id: id,
                        answer_text: format!("a{}", k),
                        is_correct: k == 0,
                        display_order: k as i32,
                        created_at: now,
                    })
                    .collect(),
            })
            .collect();
        QuizWithQuestions {
            quiz: Quiz {
                id: 1,
                lesson_id: 1,
                title: "t".into(),
                description: None,
                duration: None,
                passing_score: 60.0,
                is_active: true,
                shuffle_questions: true,
                show_answers: true,
                created_at: now,
                updated_at: now,
            },
            questions,
        }
    }

    #[test]
    fn shuffle_keeps_question_and_answer_identity() {
        let mut full = sample(8);
        shuffle(&mut full);

        let mut ids: Vec<i64> = full.questions.iter().map(|q| q.question.id).collect();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        for q in &full.questions {
            assert_eq!(q.answers.len(), 4);
            assert!(q.answers.iter().all(|a| a.question_id == q.question.id));
            assert_eq!(q.reference_answer().map(|a| a.id), Some(q.question.id * 10));
        }
    }

    #[test]
    fn student_view_hides_correct_flags() {
        let view = StudentQuizView::from(sample(2));
        let json = serde_json::to_value(&view).unwrap();
        let text = json.to_string();
        assert!(!text.contains("is_correct"));
        assert_eq!(view.questions.len(), 2);
        assert_eq!(view.questions[0].answers.len(), 4);
    }
}
