use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        content_dto::{CreateGeogebraRequest, UpdateGeogebraRequest},
        MessageResponse,
    },
    error::Result,
    extract::JsonBody,
    middleware::auth::require_teacher_or_admin,
    models::{geogebra::GeogebraFigure, user::User},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/geogebra",
    request_body = CreateGeogebraRequest,
    responses(
        (status = 201, description = "Figure stored", body = Json<GeogebraFigure>),
        (status = 400, description = "ggb_base64 is not valid base64"),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn create_figure(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<CreateGeogebraRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let figure = state.geogebra_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(figure)))
}

#[utoipa::path(
    get,
    path = "/api/geogebra/lesson/{lesson_id}",
    params(("lesson_id" = i64, Path, description = "Lesson ID")),
    responses((status = 200, description = "Figures attached to the lesson", body = Json<Vec<GeogebraFigure>>))
)]
#[axum::debug_handler]
pub async fn lesson_figures(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let figures = state.geogebra_service.for_lesson(lesson_id).await?;
    Ok(Json(figures))
}

#[utoipa::path(
    get,
    path = "/api/geogebra/{id}",
    params(("id" = i64, Path, description = "Figure ID")),
    responses(
        (status = 200, description = "Figure", body = Json<GeogebraFigure>),
        (status = 404, description = "GeoGebra content not found")
    )
)]
#[axum::debug_handler]
pub async fn get_figure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let figure = state.geogebra_service.get(id).await?;
    Ok(Json(figure))
}

#[utoipa::path(
    put,
    path = "/api/geogebra/{id}",
    params(("id" = i64, Path, description = "Figure ID")),
    request_body = UpdateGeogebraRequest,
    responses(
        (status = 200, description = "Figure updated", body = Json<GeogebraFigure>),
        (status = 404, description = "GeoGebra content not found")
    )
)]
#[axum::debug_handler]
pub async fn update_figure(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateGeogebraRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let figure = state.geogebra_service.update(id, payload).await?;
    Ok(Json(figure))
}

#[utoipa::path(
    delete,
    path = "/api/geogebra/{id}",
    params(("id" = i64, Path, description = "Figure ID")),
    responses(
        (status = 200, description = "Figure deleted", body = Json<MessageResponse>),
        (status = 404, description = "GeoGebra content not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_figure(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    state.geogebra_service.delete(id).await?;
    Ok(Json(MessageResponse::new("GeoGebra content deleted successfully")))
}
