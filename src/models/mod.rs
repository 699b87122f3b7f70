pub mod content;
pub mod feedback;
pub mod geogebra;
pub mod lesson;
pub mod quiz;
pub mod quiz_attempt;
pub mod student_progress;
pub mod user;
pub mod video;
