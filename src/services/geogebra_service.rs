use crate::dto::content_dto::{CreateGeogebraRequest, UpdateGeogebraRequest};
use crate::error::{Error, Result};
use crate::models::geogebra::GeogebraFigure;
use sqlx::PgPool;

/// Whitespace from wrapped base64 is dropped before storing.
fn compact(ggb_base64: &str) -> String {
    ggb_base64.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Clone)]
pub struct GeogebraService {
    pool: PgPool,
}

impl GeogebraService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateGeogebraRequest) -> Result<GeogebraFigure> {
        let lesson: Option<i64> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(payload.lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        if lesson.is_none() {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }

        let figure = sqlx::query_as::<_, GeogebraFigure>(
            r#"
            INSERT INTO geogebra_contents (lesson_id, title, ggb_base64, width, height, show_toolbar)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.lesson_id)
        .bind(payload.title)
        .bind(compact(&payload.ggb_base64))
        .bind(payload.width)
        .bind(payload.height)
        .bind(payload.show_toolbar)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(geogebra_id = figure.id, lesson_id = figure.lesson_id, "geogebra figure created");
        Ok(figure)
    }

    pub async fn for_lesson(&self, lesson_id: i64) -> Result<Vec<GeogebraFigure>> {
        let figures = sqlx::query_as::<_, GeogebraFigure>(
            "SELECT * FROM geogebra_contents WHERE lesson_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(figures)
    }

    pub async fn get(&self, id: i64) -> Result<GeogebraFigure> {
        sqlx::query_as::<_, GeogebraFigure>("SELECT * FROM geogebra_contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("GeoGebra content not found".to_string()))
    }

    pub async fn update(&self, id: i64, payload: UpdateGeogebraRequest) -> Result<GeogebraFigure> {
        sqlx::query_as::<_, GeogebraFigure>(
            r#"
            UPDATE geogebra_contents
            SET
                title = COALESCE($2, title),
                ggb_base64 = COALESCE($3, ggb_base64),
                width = COALESCE($4, width),
                height = COALESCE($5, height),
                show_toolbar = COALESCE($6, show_toolbar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.ggb_base64.as_deref().map(compact))
        .bind(payload.width)
        .bind(payload.height)
        .bind(payload.show_toolbar)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("GeoGebra content not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM geogebra_contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("GeoGebra content not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_strips_line_breaks() {
        assert_eq!(compact("UEsD\r\nBBQA AAAI"), "UEsDBBQAAAAI");
    }
}
