pub mod config;
pub mod database;
pub mod docs;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    admin_service::AdminService, content_service::ContentService,
    feedback_service::FeedbackService, geogebra_service::GeogebraService,
    lesson_service::LessonService, progress_service::ProgressService, quiz_service::QuizService,
    settings_service::SettingsService, upload_service::UploadService, user_service::UserService,
    video_service::VideoService,
};
use crate::utils::token::TokenService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
    pub user_service: UserService,
    pub lesson_service: LessonService,
    pub progress_service: ProgressService,
    pub quiz_service: QuizService,
    pub feedback_service: FeedbackService,
    pub admin_service: AdminService,
    pub video_service: VideoService,
    pub content_service: ContentService,
    pub geogebra_service: GeogebraService,
    pub upload_service: UploadService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        Self {
            tokens: TokenService::from_config(),
            user_service: UserService::new(pool.clone()),
            lesson_service: LessonService::new(pool.clone()),
            progress_service: ProgressService::new(pool.clone()),
            quiz_service: QuizService::new(pool.clone()),
            feedback_service: FeedbackService::new(pool.clone()),
            admin_service: AdminService::new(pool.clone()),
            video_service: VideoService::new(pool.clone()),
            content_service: ContentService::new(pool.clone()),
            geogebra_service: GeogebraService::new(pool.clone()),
            upload_service: UploadService::new(
                &config.upload_dir,
                config.max_file_size,
                config.max_video_size,
            ),
            settings_service: SettingsService::new(&config.site),
            pool,
        }
    }
}
