pub mod admin;
pub mod auth;
pub mod content;
pub mod feedback;
pub mod geogebra;
pub mod health;
pub mod lesson;
pub mod quiz;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    docs::ApiDoc,
    middleware::auth::{require_admin_user, require_auth},
    AppState,
};

/// Every `/api` route plus `/health`; static file serving and outer layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let config = crate::config::get_config();
    let upload_limit = config.max_file_size.max(config.max_video_size) + 1024 * 1024;

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/login/form", post(auth::login_form))
        .route("/api/lessons/published", get(lesson::list_published_lessons))
        .route("/api/feedback/lesson/:lesson_id", get(feedback::lesson_feedback))
        .route("/api/videos", get(content::list_videos))
        .route("/api/videos/:id", get(content::get_video))
        .route("/api/content/math", get(content::math_content));

    let authed_api = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/settings", put(auth::update_settings))
        .route("/api/auth/change-password", post(auth::change_password))
        .route(
            "/api/lessons",
            get(lesson::list_lessons).post(lesson::create_lesson),
        )
        .route("/api/lessons/my-lessons", get(lesson::my_lessons))
        .route(
            "/api/lessons/:id",
            get(lesson::get_lesson)
                .put(lesson::update_lesson)
                .delete(lesson::delete_lesson),
        )
        .route("/api/lessons/slug/:slug", get(lesson::get_lesson_by_slug))
        .route("/api/lessons/:id/progress", post(lesson::update_progress))
        .route(
            "/api/quizzes",
            get(quiz::list_quizzes).post(quiz::create_quiz),
        )
        .route(
            "/api/quizzes/:id",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route(
            "/api/quizzes/lesson/:lesson_id/quiz",
            get(quiz::get_lesson_quiz),
        )
        .route("/api/quizzes/:id/submit", post(quiz::submit_quiz))
        .route("/api/quizzes/:id/best-attempt", get(quiz::best_attempt))
        .route(
            "/api/quizzes/attempts/my-attempts",
            get(quiz::my_attempts),
        )
        .route("/api/quizzes/attempts/:id", get(quiz::get_attempt))
        .route("/api/feedback", post(feedback::create_feedback))
        .route("/api/feedback/my-feedback", get(feedback::my_feedback))
        .route(
            "/api/feedback/:id",
            get(feedback::get_feedback)
                .put(feedback::update_feedback)
                .delete(feedback::delete_feedback),
        )
        .route("/api/geogebra", post(geogebra::create_figure))
        .route(
            "/api/geogebra/lesson/:lesson_id",
            get(geogebra::lesson_figures),
        )
        .route(
            "/api/geogebra/:id",
            get(geogebra::get_figure)
                .put(geogebra::update_figure)
                .delete(geogebra::delete_figure),
        )
        .route("/api/upload/image", post(upload::upload_image))
        .route("/api/upload/video", post(upload::upload_video))
        .route(
            "/api/upload/:file_type/:filename",
            delete(upload::delete_upload),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin_api = Router::new()
        .route(
            "/students",
            get(admin::list_students).post(admin::create_student),
        )
        .route(
            "/students/:id",
            put(admin::update_student).delete(admin::delete_student),
        )
        .route(
            "/results/lesson-progress",
            get(admin::lesson_progress_results),
        )
        .route("/results/quiz-attempts", get(admin::quiz_attempt_results))
        .route("/feedback", get(admin::list_feedback))
        .route("/feedback/:id", delete(admin::delete_feedback))
        .route("/dashboard/stats", get(admin::dashboard_stats))
        .route("/videos", get(admin::list_videos).post(admin::create_video))
        .route(
            "/videos/:id",
            put(admin::update_video).delete(admin::delete_video),
        )
        .route(
            "/content",
            get(admin::list_content).post(admin::create_content),
        )
        .route(
            "/content/:id",
            put(admin::update_content).delete(admin::delete_content),
        )
        .route(
            "/settings",
            get(admin::get_site_settings).put(admin::update_site_settings),
        )
        .route(
            "/settings/change-password",
            post(admin::change_admin_password),
        )
        .route_layer(from_fn(require_admin_user))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public_api
        .merge(authed_api)
        .nest("/api/admin", admin_api)
        .with_state(state)
}
