use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        feedback_dto::{CreateFeedbackRequest, MyFeedbackQuery, UpdateFeedbackRequest},
        MessageResponse,
    },
    error::Result,
    extract::{JsonBody, QueryParams},
    models::{
        feedback::{Feedback, FeedbackDetail},
        user::User,
    },
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored; an earlier review of the lesson is replaced", body = Json<Feedback>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn create_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<CreateFeedbackRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let feedback = state.feedback_service.submit(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[utoipa::path(
    get,
    path = "/api/feedback/my-feedback",
    params(("lesson_id" = Option<i64>, Query, description = "Filter by lesson")),
    responses((status = 200, description = "Caller's feedback", body = Json<Vec<Feedback>>))
)]
#[axum::debug_handler]
pub async fn my_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(query): QueryParams<MyFeedbackQuery>,
) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.mine(user.id, query.lesson_id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/feedback/lesson/{lesson_id}",
    params(("lesson_id" = i64, Path, description = "Lesson ID")),
    responses((status = 200, description = "Latest feedback for the lesson", body = Json<Vec<FeedbackDetail>>))
)]
#[axum::debug_handler]
pub async fn lesson_feedback(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.for_lesson(lesson_id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    params(("id" = i64, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback", body = Json<Feedback>),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let feedback = state.feedback_service.get(id).await?;
    Ok(Json(feedback))
}

#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    params(("id" = i64, Path, description = "Feedback ID")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = Json<Feedback>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn update_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateFeedbackRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let feedback = state.feedback_service.update(user.id, id, payload).await?;
    Ok(Json(feedback))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = i64, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback deleted", body = Json<MessageResponse>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.feedback_service.delete(id, Some(user.id)).await?;
    Ok(Json(MessageResponse::new("Feedback deleted successfully")))
}
