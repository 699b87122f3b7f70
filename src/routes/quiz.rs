use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        quiz_dto::{
            AttemptListQuery, CreateQuizRequest, QuizListQuery, StudentQuizView,
            SubmitQuizRequest, SubmitQuizResponse, UpdateQuizRequest,
        },
        MessageResponse,
    },
    error::Result,
    extract::{JsonBody, QueryParams},
    middleware::auth::require_teacher_or_admin,
    models::{quiz::QuizWithQuestions, quiz_attempt::QuizAttempt, user::User},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created with its questions", body = Json<QuizWithQuestions>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<CreateQuizRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let quiz = state.quiz_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[utoipa::path(
    get,
    path = "/api/quizzes",
    params(("lesson_id" = Option<i64>, Query, description = "Filter by lesson")),
    responses((status = 200, description = "Quizzes with answers", body = Json<Vec<QuizWithQuestions>>))
)]
#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(query): QueryParams<QuizListQuery>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    let quizzes = state.quiz_service.list(query.lesson_id).await?;
    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    params(("id" = i64, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz with answers", body = Json<QuizWithQuestions>),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    let quiz = state.quiz_service.get(id).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    put,
    path = "/api/quizzes/{id}",
    params(("id" = i64, Path, description = "Quiz ID")),
    request_body = UpdateQuizRequest,
    responses(
        (status = 200, description = "Quiz updated", body = Json<QuizWithQuestions>),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateQuizRequest>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    payload.validate()?;
    let quiz = state.quiz_service.update(id, payload).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    params(("id" = i64, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz deleted", body = Json<MessageResponse>),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    state.quiz_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Quiz deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/lesson/{lesson_id}/quiz",
    params(("lesson_id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Active quiz without correct answers", body = Json<StudentQuizView>),
        (status = 404, description = "No active quiz found for this lesson")
    )
)]
#[axum::debug_handler]
pub async fn get_lesson_quiz(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.for_lesson(lesson_id).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/submit",
    params(("id" = i64, Path, description = "Quiz ID")),
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Attempt graded", body = Json<SubmitQuizResponse>),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<SubmitQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.quiz_service.submit(user.id, id, payload).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/attempts/my-attempts",
    params(("quiz_id" = Option<i64>, Query, description = "Filter by quiz")),
    responses((status = 200, description = "Caller's attempts, newest first", body = Json<Vec<QuizAttempt>>))
)]
#[axum::debug_handler]
pub async fn my_attempts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(query): QueryParams<AttemptListQuery>,
) -> Result<impl IntoResponse> {
    let attempts = state.quiz_service.my_attempts(user.id, query.quiz_id).await?;
    Ok(Json(attempts))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/attempts/{id}",
    params(("id" = i64, Path, description = "Attempt ID")),
    responses(
        (status = 200, description = "Attempt", body = Json<QuizAttempt>),
        (status = 404, description = "Attempt not found")
    )
)]
#[axum::debug_handler]
pub async fn get_attempt(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let attempt = state.quiz_service.attempt(user.id, id).await?;
    Ok(Json(attempt))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/best-attempt",
    params(("id" = i64, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Highest scoring attempt", body = Json<QuizAttempt>),
        (status = 404, description = "No attempts found for this quiz")
    )
)]
#[axum::debug_handler]
pub async fn best_attempt(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let attempt = state.quiz_service.best_attempt(user.id, id).await?;
    Ok(Json(attempt))
}
