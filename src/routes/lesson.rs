use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        lesson_dto::{
            CreateLessonRequest, LessonListQuery, StudentLessonResponse, UpdateLessonRequest,
        },
        progress_dto::{ProgressQuery, ProgressResponse, UpdateProgressRequest},
        MessageResponse,
    },
    error::{Error, Result},
    extract::{JsonBody, QueryParams},
    middleware::auth::{require_student, require_teacher_or_admin},
    models::{lesson::Lesson, user::User},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = Json<Lesson>),
        (status = 400, description = "Lesson slug already exists"),
        (status = 403, description = "Teacher or admin only")
    )
)]
#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<CreateLessonRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let lesson = state.lesson_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 100"),
        ("grade" = Option<i32>, Query, description = "Filter by grade"),
        ("difficulty" = Option<String>, Query, description = "easy, medium or hard")
    ),
    responses((status = 200, description = "All lessons", body = Json<Vec<Lesson>>))
)]
#[axum::debug_handler]
pub async fn list_lessons(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(query): QueryParams<LessonListQuery>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    query.validate()?;
    let lessons = state.lesson_service.list(&query, false).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/published",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 100"),
        ("grade" = Option<i32>, Query, description = "Filter by grade"),
        ("difficulty" = Option<String>, Query, description = "easy, medium or hard")
    ),
    responses((status = 200, description = "Published lessons", body = Json<Vec<Lesson>>))
)]
#[axum::debug_handler]
pub async fn list_published_lessons(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LessonListQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let lessons = state.lesson_service.list(&query, true).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/my-lessons",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, 1 to 100"),
        ("grade" = Option<i32>, Query, description = "Filter by grade"),
        ("difficulty" = Option<String>, Query, description = "easy, medium or hard")
    ),
    responses(
        (status = 200, description = "Published lessons with the caller's progress", body = Json<Vec<StudentLessonResponse>>),
        (status = 403, description = "Students only")
    )
)]
#[axum::debug_handler]
pub async fn my_lessons(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(query): QueryParams<LessonListQuery>,
) -> Result<impl IntoResponse> {
    require_student(&user)?;
    query.validate()?;
    let lessons = state.lesson_service.list_for_student(user.id, &query).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson found", body = Json<Lesson>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let lesson = state.lesson_service.get_by_id(id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    get,
    path = "/api/lessons/slug/{slug}",
    params(("slug" = String, Path, description = "Lesson slug")),
    responses(
        (status = 200, description = "Lesson found", body = Json<Lesson>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn get_lesson_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let lesson = state.lesson_service.get_by_slug(&slug).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    request_body = UpdateLessonRequest,
    responses(
        (status = 200, description = "Lesson updated", body = Json<Lesson>),
        (status = 400, description = "Lesson slug already exists"),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateLessonRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let lesson = state.lesson_service.update(id, payload).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted", body = Json<MessageResponse>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    state.lesson_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Lesson deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/lessons/{id}/progress",
    params(
        ("id" = i64, Path, description = "Lesson ID"),
        ("progress_percentage" = Option<f64>, Query, description = "0 to 100, clamped"),
        ("completed_sections" = Option<String>, Query, description = "Comma-separated section IDs"),
        ("time_spent" = Option<i32>, Query, description = "Seconds spent")
    ),
    request_body = UpdateProgressRequest,
    responses(
        (status = 200, description = "Progress stored", body = Json<ProgressResponse>),
        (status = 400, description = "No progress percentage supplied"),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    QueryParams(query): QueryParams<ProgressQuery>,
    body: Option<JsonBody<UpdateProgressRequest>>,
) -> Result<impl IntoResponse> {
    require_student(&user)?;
    let payload = query
        .into_request()
        .or_else(|| body.map(|JsonBody(payload)| payload))
        .ok_or_else(|| Error::BadRequest("progress_percentage is required".to_string()))?;
    payload.validate()?;
    let progress = state.progress_service.update(user.id, id, payload).await?;
    Ok(Json(ProgressResponse::from(progress)))
}
