use crate::dto::admin_dto::{CreateContentRequest, UpdateContentRequest};
use crate::error::{Error, Result};
use crate::models::content::ContentSection;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, published_only: bool) -> Result<Vec<ContentSection>> {
        let sections = sqlx::query_as::<_, ContentSection>(
            r#"
            SELECT * FROM contents
            WHERE (NOT $1 OR is_published)
            ORDER BY display_order ASC, id ASC
            "#,
        )
        .bind(published_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(sections)
    }

    pub async fn create(&self, payload: CreateContentRequest) -> Result<ContentSection> {
        let section = sqlx::query_as::<_, ContentSection>(
            r#"
            INSERT INTO contents (
                section_type, title, content_html, display_order, geogebra_embed, is_published
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.section_type)
        .bind(payload.title)
        .bind(payload.content_html)
        .bind(payload.order)
        .bind(payload.geogebra_embed)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;
        Ok(section)
    }

    pub async fn update(&self, id: i64, payload: UpdateContentRequest) -> Result<ContentSection> {
        sqlx::query_as::<_, ContentSection>(
            r#"
            UPDATE contents
            SET
                section_type = COALESCE($2, section_type),
                title = COALESCE($3, title),
                content_html = COALESCE($4, content_html),
                display_order = COALESCE($5, display_order),
                geogebra_embed = COALESCE($6, geogebra_embed),
                is_published = COALESCE($7, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.section_type)
        .bind(payload.title)
        .bind(payload.content_html)
        .bind(payload.order)
        .bind(payload.geogebra_embed)
        .bind(payload.is_published)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Content not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Content not found".to_string()));
        }
        Ok(())
    }
}
