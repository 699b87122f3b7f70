pub mod admin_service;
pub mod content_service;
pub mod feedback_service;
pub mod geogebra_service;
pub mod grading_service;
pub mod lesson_service;
pub mod progress_service;
pub mod quiz_service;
pub mod settings_service;
pub mod upload_service;
pub mod user_service;
pub mod video_service;
