use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        admin_dto::{
            CreateContentRequest, CreateStudentRequest, CreateVideoRequest, DashboardStats,
            LessonProgressResult, QuizAttemptResult, SiteSettings, UpdateContentRequest,
            UpdateSiteSettingsRequest, UpdateStudentRequest, UpdateVideoRequest,
        },
        auth_dto::{ChangePasswordRequest, UserResponse},
        MessageResponse,
    },
    error::Result,
    extract::JsonBody,
    models::{content::ContentSection, feedback::FeedbackDetail, user::User, video::Video},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/students",
    responses((status = 200, description = "All students", body = Json<Vec<UserResponse>>))
)]
#[axum::debug_handler]
pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let students = state.admin_service.list_students().await?;
    Ok(Json(
        students
            .into_iter()
            .map(UserResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Json<UserResponse>),
        (status = 400, description = "Username or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_student(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateStudentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let student = state.admin_service.create_student(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(student))))
}

#[utoipa::path(
    put,
    path = "/api/admin/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = Json<UserResponse>),
        (status = 404, description = "Student not found")
    )
)]
#[axum::debug_handler]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateStudentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let student = state.admin_service.update_student(id, payload).await?;
    Ok(Json(UserResponse::from(student)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = Json<MessageResponse>),
        (status = 404, description = "Student not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.admin_service.delete_student(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/results/lesson-progress",
    responses((status = 200, description = "Progress of every student", body = Json<Vec<LessonProgressResult>>))
)]
#[axum::debug_handler]
pub async fn lesson_progress_results(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.admin_service.lesson_progress().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/admin/results/quiz-attempts",
    responses((status = 200, description = "Every quiz attempt", body = Json<Vec<QuizAttemptResult>>))
)]
#[axum::debug_handler]
pub async fn quiz_attempt_results(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.admin_service.quiz_attempts().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/admin/feedback",
    responses((status = 200, description = "All feedback with author and lesson", body = Json<Vec<FeedbackDetail>>))
)]
#[axum::debug_handler]
pub async fn list_feedback(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.list_all().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    delete,
    path = "/api/admin/feedback/{id}",
    operation_id = "admin_delete_feedback",
    params(("id" = i64, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback removed", body = Json<MessageResponse>),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.feedback_service.delete(id, None).await?;
    Ok(Json(MessageResponse::new("Feedback deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses((status = 200, description = "Site totals", body = Json<DashboardStats>))
)]
#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.dashboard_stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/videos",
    operation_id = "admin_list_videos",
    responses((status = 200, description = "All videos, published or not", body = Json<Vec<Video>>))
)]
#[axum::debug_handler]
pub async fn list_videos(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let videos = state.video_service.list(false).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    post,
    path = "/api/admin/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video created", body = Json<Video>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_video(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateVideoRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let video = state.video_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    put,
    path = "/api/admin/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = Json<Video>),
        (status = 404, description = "Video not found")
    )
)]
#[axum::debug_handler]
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateVideoRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let video = state.video_service.update(id, payload).await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/admin/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted", body = Json<MessageResponse>),
        (status = 404, description = "Video not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.video_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/content",
    responses((status = 200, description = "All content sections", body = Json<Vec<ContentSection>>))
)]
#[axum::debug_handler]
pub async fn list_content(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sections = state.content_service.list(false).await?;
    Ok(Json(sections))
}

#[utoipa::path(
    post,
    path = "/api/admin/content",
    request_body = CreateContentRequest,
    responses((status = 201, description = "Section created", body = Json<ContentSection>))
)]
#[axum::debug_handler]
pub async fn create_content(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateContentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let section = state.content_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[utoipa::path(
    put,
    path = "/api/admin/content/{id}",
    params(("id" = i64, Path, description = "Section ID")),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Section updated", body = Json<ContentSection>),
        (status = 404, description = "Content not found")
    )
)]
#[axum::debug_handler]
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateContentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let section = state.content_service.update(id, payload).await?;
    Ok(Json(section))
}

#[utoipa::path(
    delete,
    path = "/api/admin/content/{id}",
    params(("id" = i64, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section deleted", body = Json<MessageResponse>),
        (status = 404, description = "Content not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.content_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Content deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "Site settings", body = Json<SiteSettings>))
)]
#[axum::debug_handler]
pub async fn get_site_settings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.settings_service.get()?))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSiteSettingsRequest,
    responses((status = 200, description = "Settings updated", body = Json<SiteSettings>))
)]
#[axum::debug_handler]
pub async fn update_site_settings(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateSiteSettingsRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    Ok(Json(state.settings_service.update(payload)?))
}

#[utoipa::path(
    post,
    path = "/api/admin/settings/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = Json<MessageResponse>),
        (status = 400, description = "Current password is incorrect")
    )
)]
#[axum::debug_handler]
pub async fn change_admin_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.user_service.change_password(&user, payload).await?;
    tracing::info!(admin_id = user.id, "admin password changed");
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
