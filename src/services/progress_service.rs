use crate::dto::progress_dto::UpdateProgressRequest;
use crate::error::{Error, Result};
use crate::models::student_progress::StudentProgress;
use sqlx::{PgConnection, PgPool};

/// Percentages outside [0, 100] are pulled back into range; NaN counts as no progress.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub fn is_complete(percentage: f64) -> bool {
    percentage >= 100.0
}

/// Mean of the previous average and the new score, not a running mean over all attempts.
pub fn next_average(previous: Option<f64>, score: f64) -> f64 {
    match previous {
        Some(prev) => (prev + score) / 2.0,
        None => score,
    }
}

#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn update(
        &self,
        user_id: i64,
        lesson_id: i64,
        payload: UpdateProgressRequest,
    ) -> Result<StudentProgress> {
        let lesson: Option<i64> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        if lesson.is_none() {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }

        let percentage = clamp_percentage(payload.progress_percentage);
        let completed = is_complete(percentage);
        let sections = payload
            .completed_sections
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let progress = sqlx::query_as::<_, StudentProgress>(
            r#"
            INSERT INTO student_progress (
                user_id, lesson_id, progress_percentage, is_completed,
                completed_sections, time_spent, completed_at, last_accessed
            ) VALUES (
                $1, $2, $3, $4, $5, COALESCE($6, 0),
                CASE WHEN $4 THEN NOW() END, NOW()
            )
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                progress_percentage = EXCLUDED.progress_percentage,
                is_completed = EXCLUDED.is_completed,
                completed_sections = COALESCE($5, student_progress.completed_sections),
                time_spent = COALESCE($6, student_progress.time_spent),
                completed_at = CASE
                    WHEN student_progress.completed_at IS NULL AND $4 THEN NOW()
                    ELSE student_progress.completed_at
                END,
                last_accessed = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(percentage)
        .bind(completed)
        .bind(sections)
        .bind(payload.time_spent)
        .fetch_one(&self.pool)
        .await?;

        if completed {
            tracing::info!(user_id, lesson_id, "lesson completed");
        }
        Ok(progress)
    }

    /// Records a passing quiz score against the lesson, creating the progress row if needed.
    /// Runs on the caller's connection so it commits or rolls back with the attempt.
    pub async fn record_quiz_pass(
        conn: &mut PgConnection,
        user_id: i64,
        lesson_id: i64,
        score: f64,
    ) -> Result<()> {
        let previous: Option<Option<f64>> = sqlx::query_scalar(
            r#"
            SELECT average_score FROM student_progress
            WHERE user_id = $1 AND lesson_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_optional(&mut *conn)
        .await?;

        let average = next_average(previous.flatten(), score);

        sqlx::query(
            r#"
            INSERT INTO student_progress (user_id, lesson_id, quiz_score, average_score, last_accessed)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                quiz_score = EXCLUDED.quiz_score,
                average_score = EXCLUDED.average_score,
                last_accessed = NOW()
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(score)
        .bind(average)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_clamped() {
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(-10.0), 0.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
    }

    #[test]
    fn completion_only_at_hundred() {
        assert!(is_complete(clamp_percentage(150.0)));
        assert!(is_complete(100.0));
        assert!(!is_complete(99.99));
    }

    #[test]
    fn average_is_two_point_mean() {
        assert_eq!(next_average(None, 80.0), 80.0);
        assert_eq!(next_average(Some(80.0), 100.0), 90.0);
        // Three passes 60, 80, 100 give 85 rather than the true mean of 80.
        let avg = next_average(next_average(Some(60.0), 80.0).into(), 100.0);
        assert_eq!(avg, 85.0);
    }
}
