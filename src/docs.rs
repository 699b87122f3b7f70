use utoipa::OpenApi;

use crate::routes::{admin, auth, content, feedback, geogebra, lesson, quiz, upload};

#[derive(OpenApi)]
#[openapi(
    info(title = "Math Learning API", description = "Lessons, quizzes, progress and feedback"),
    paths(
        auth::register,
        auth::login,
        auth::login_form,
        auth::logout,
        auth::me,
        auth::verify,
        auth::update_settings,
        auth::change_password,
        lesson::create_lesson,
        lesson::list_lessons,
        lesson::list_published_lessons,
        lesson::my_lessons,
        lesson::get_lesson,
        lesson::get_lesson_by_slug,
        lesson::update_lesson,
        lesson::delete_lesson,
        lesson::update_progress,
        quiz::create_quiz,
        quiz::list_quizzes,
        quiz::get_quiz,
        quiz::update_quiz,
        quiz::delete_quiz,
        quiz::get_lesson_quiz,
        quiz::submit_quiz,
        quiz::my_attempts,
        quiz::get_attempt,
        quiz::best_attempt,
        feedback::create_feedback,
        feedback::my_feedback,
        feedback::lesson_feedback,
        feedback::get_feedback,
        feedback::update_feedback,
        feedback::delete_feedback,
        admin::list_students,
        admin::create_student,
        admin::update_student,
        admin::delete_student,
        admin::lesson_progress_results,
        admin::quiz_attempt_results,
        admin::list_feedback,
        admin::delete_feedback,
        admin::dashboard_stats,
        admin::list_videos,
        admin::create_video,
        admin::update_video,
        admin::delete_video,
        admin::list_content,
        admin::create_content,
        admin::update_content,
        admin::delete_content,
        admin::get_site_settings,
        admin::update_site_settings,
        admin::change_admin_password,
        content::list_videos,
        content::get_video,
        content::math_content,
        geogebra::create_figure,
        geogebra::lesson_figures,
        geogebra::get_figure,
        geogebra::update_figure,
        geogebra::delete_figure,
        upload::upload_image,
        upload::upload_video,
        upload::delete_upload,
    )
)]
pub struct ApiDoc;
