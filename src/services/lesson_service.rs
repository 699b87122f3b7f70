use crate::dto::lesson_dto::{
    CreateLessonRequest, LessonListQuery, StudentLessonResponse, UpdateLessonRequest,
};
use crate::error::{Error, Result};
use crate::models::lesson::Lesson;
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct LessonService {
    pool: PgPool,
}

#[derive(FromRow)]
struct LessonWithProgress {
    #[sqlx(flatten)]
    lesson: Lesson,
    progress_percentage: Option<f64>,
    progress_completed: Option<bool>,
    completed_sections: Option<String>,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateLessonRequest) -> Result<Lesson> {
        if self.find_by_slug(&payload.slug).await?.is_some() {
            return Err(Error::BadRequest("Lesson slug already exists".to_string()));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (
                title, slug, description, thumbnail, video_url, content,
                grade, duration, difficulty, display_order, is_published
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.description)
        .bind(&payload.thumbnail)
        .bind(&payload.video_url)
        .bind(&payload.content)
        .bind(payload.grade)
        .bind(payload.duration)
        .bind(payload.difficulty.as_str())
        .bind(payload.order)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(lesson_id = lesson.id, slug = %lesson.slug, "lesson created");
        Ok(lesson)
    }

    pub async fn list(&self, query: &LessonListQuery, published_only: bool) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT * FROM lessons
            WHERE ($1::INT IS NULL OR grade = $1)
              AND ($2::TEXT IS NULL OR difficulty = $2)
              AND (NOT $3 OR is_published)
            ORDER BY display_order ASC, created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(query.grade)
        .bind(query.difficulty.map(|d| d.as_str()))
        .bind(published_only)
        .bind(query.skip())
        .bind(query.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    pub async fn list_for_student(
        &self,
        user_id: i64,
        query: &LessonListQuery,
    ) -> Result<Vec<StudentLessonResponse>> {
        let rows = sqlx::query_as::<_, LessonWithProgress>(
            r#"
            SELECT
                l.*,
                p.progress_percentage,
                p.is_completed AS progress_completed,
                p.completed_sections
            FROM lessons l
            LEFT JOIN student_progress p ON p.lesson_id = l.id AND p.user_id = $1
            WHERE l.is_published
              AND ($2::INT IS NULL OR l.grade = $2)
              AND ($3::TEXT IS NULL OR l.difficulty = $3)
            ORDER BY l.display_order ASC, l.created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(user_id)
        .bind(query.grade)
        .bind(query.difficulty.map(|d| d.as_str()))
        .bind(query.skip())
        .bind(query.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StudentLessonResponse {
                lesson: row.lesson,
                progress: row.progress_percentage.unwrap_or(0.0),
                is_completed: row.progress_completed.unwrap_or(false),
                completed_sections: row
                    .completed_sections
                    .as_deref()
                    .and_then(|raw| serde_json::from_str(raw).ok())
                    .unwrap_or_default(),
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Lesson> {
        sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Lesson> {
        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lesson)
    }

    pub async fn update(&self, id: i64, payload: UpdateLessonRequest) -> Result<Lesson> {
        let current = self.get_by_id(id).await?;

        if let Some(slug) = payload.slug.as_deref() {
            if slug != current.slug && self.find_by_slug(slug).await?.is_some() {
                return Err(Error::BadRequest("Lesson slug already exists".to_string()));
            }
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                thumbnail = COALESCE($5, thumbnail),
                video_url = COALESCE($6, video_url),
                content = COALESCE($7, content),
                grade = COALESCE($8, grade),
                duration = COALESCE($9, duration),
                difficulty = COALESCE($10, difficulty),
                display_order = COALESCE($11, display_order),
                is_published = COALESCE($12, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.slug)
        .bind(payload.description)
        .bind(payload.thumbnail)
        .bind(payload.video_url)
        .bind(payload.content)
        .bind(payload.grade)
        .bind(payload.duration)
        .bind(payload.difficulty.map(|d| d.as_str()))
        .bind(payload.order)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }
        tracing::info!(lesson_id = id, "lesson deleted");
        Ok(())
    }
}
