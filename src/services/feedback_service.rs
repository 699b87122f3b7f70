use crate::dto::feedback_dto::{CreateFeedbackRequest, UpdateFeedbackRequest};
use crate::error::{Error, Result};
use crate::models::feedback::{Feedback, FeedbackDetail};
use crate::utils::numeric::round2;
use sqlx::{PgConnection, PgPool};

const DETAIL_SELECT: &str = r#"
    SELECT
        f.*,
        u.full_name AS user_name,
        u.email AS user_email,
        l.title AS lesson_title
    FROM feedbacks f
    LEFT JOIN users u ON u.id = f.user_id
    LEFT JOIN lessons l ON l.id = f.lesson_id
"#;

/// Lesson rating and review count from the aggregate over its feedback rows.
pub fn rating_summary(average: Option<f64>, count: i64) -> (f64, i32) {
    if count == 0 {
        return (0.0, 0);
    }
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    (round2(average.unwrap_or(0.0)), count)
}

/// Recomputes `lessons.rating` and `lessons.review_count` from the current feedback rows.
pub async fn recompute_lesson_rating(conn: &mut PgConnection, lesson_id: i64) -> Result<()> {
    let (average, count): (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(rating)::FLOAT8, COUNT(*) FROM feedbacks WHERE lesson_id = $1",
    )
    .bind(lesson_id)
    .fetch_one(&mut *conn)
    .await?;

    let (rating, review_count) = rating_summary(average, count);
    sqlx::query(
        "UPDATE lessons SET rating = $2, review_count = $3, updated_at = NOW() WHERE id = $1",
    )
    .bind(lesson_id)
    .bind(rating)
    .bind(review_count)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(lesson_id, rating, review_count, "lesson rating recomputed");
    Ok(())
}

#[derive(Clone)]
pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A second submission for the same lesson overwrites the first.
    pub async fn submit(&self, user_id: i64, payload: CreateFeedbackRequest) -> Result<Feedback> {
        let mut tx = self.pool.begin().await?;

        let lesson: Option<i64> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(payload.lesson_id)
            .fetch_optional(&mut *tx)
            .await?;
        if lesson.is_none() {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }

        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedbacks (user_id, lesson_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                comment = EXCLUDED.comment,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.lesson_id)
        .bind(payload.rating)
        .bind(&payload.comment)
        .fetch_one(&mut *tx)
        .await?;

        recompute_lesson_rating(&mut tx, feedback.lesson_id).await?;
        tx.commit().await?;

        Ok(feedback)
    }

    pub async fn mine(&self, user_id: i64, lesson_id: Option<i64>) -> Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT * FROM feedbacks
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR lesson_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn for_lesson(&self, lesson_id: i64) -> Result<Vec<FeedbackDetail>> {
        let sql = format!(
            "{} WHERE f.lesson_id = $1 ORDER BY f.created_at DESC LIMIT 100",
            DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, FeedbackDetail>(&sql)
            .bind(lesson_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<FeedbackDetail>> {
        let sql = format!("{} ORDER BY f.created_at DESC", DETAIL_SELECT);
        let rows = sqlx::query_as::<_, FeedbackDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Feedback> {
        sqlx::query_as::<_, Feedback>("SELECT * FROM feedbacks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Feedback not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        payload: UpdateFeedbackRequest,
    ) -> Result<Feedback> {
        let existing = self.get(id).await?;
        if existing.user_id != user_id {
            return Err(Error::Forbidden(
                "Not enough permissions to edit this feedback".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedbacks
            SET
                rating = COALESCE($2, rating),
                comment = COALESCE($3, comment),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.rating)
        .bind(&payload.comment)
        .fetch_one(&mut *tx)
        .await?;

        recompute_lesson_rating(&mut tx, feedback.lesson_id).await?;
        tx.commit().await?;
        Ok(feedback)
    }

    /// Owners may delete their own feedback; moderators pass `owner = None`.
    pub async fn delete(&self, id: i64, owner: Option<i64>) -> Result<()> {
        let existing = self.get(id).await?;
        if let Some(user_id) = owner {
            if existing.user_id != user_id {
                return Err(Error::Forbidden(
                    "Not enough permissions to delete this feedback".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM feedbacks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        recompute_lesson_rating(&mut tx, existing.lesson_id).await?;
        tx.commit().await?;

        tracing::info!(feedback_id = id, lesson_id = existing.lesson_id, "feedback deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_feedback_resets_rating() {
        assert_eq!(rating_summary(None, 0), (0.0, 0));
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        assert_eq!(rating_summary(Some(4.0 + 2.0 / 3.0), 3), (4.67, 3));
        assert_eq!(rating_summary(Some(5.0), 1), (5.0, 1));
    }
}
