use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    error::Result,
    models::{content::ContentSection, video::Video},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/videos",
    responses((status = 200, description = "Published videos", body = Json<Vec<Video>>))
)]
#[axum::debug_handler]
pub async fn list_videos(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let videos = state.video_service.list(true).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video, with its view counted", body = Json<Video>),
        (status = 404, description = "Video not found")
    )
)]
#[axum::debug_handler]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let video = state.video_service.view(id).await?;
    Ok(Json(video))
}

#[utoipa::path(
    get,
    path = "/api/content/math",
    responses((status = 200, description = "Published content sections in display order", body = Json<Vec<ContentSection>>))
)]
#[axum::debug_handler]
pub async fn math_content(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sections = state.content_service.list(true).await?;
    Ok(Json(sections))
}
