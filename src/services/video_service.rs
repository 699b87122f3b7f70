use crate::dto::admin_dto::{CreateVideoRequest, UpdateVideoRequest};
use crate::error::{Error, Result};
use crate::models::video::Video;
use sqlx::PgPool;

#[derive(Clone)]
pub struct VideoService {
    pool: PgPool,
}

impl VideoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, published_only: bool) -> Result<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE (NOT $1 OR is_published) ORDER BY created_at DESC",
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    /// Counts a view and returns the published video.
    pub async fn view(&self, id: i64) -> Result<Video> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos SET views = views + 1
            WHERE id = $1 AND is_published
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Video not found".to_string()))
    }

    pub async fn create(&self, payload: CreateVideoRequest) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (
                title, description, video_type, video_url, duration,
                timeline, key_points, attachments, is_published
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.video_type)
        .bind(payload.video_url)
        .bind(payload.duration)
        .bind(payload.timeline)
        .bind(payload.key_points)
        .bind(payload.attachments)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    pub async fn update(&self, id: i64, payload: UpdateVideoRequest) -> Result<Video> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                video_type = COALESCE($4, video_type),
                video_url = COALESCE($5, video_url),
                duration = COALESCE($6, duration),
                timeline = COALESCE($7, timeline),
                key_points = COALESCE($8, key_points),
                attachments = COALESCE($9, attachments),
                is_published = COALESCE($10, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.video_type)
        .bind(payload.video_url)
        .bind(payload.duration)
        .bind(payload.timeline)
        .bind(payload.key_points)
        .bind(payload.attachments)
        .bind(payload.is_published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Video not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Video not found".to_string()));
        }
        Ok(())
    }
}
