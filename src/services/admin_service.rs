use crate::dto::admin_dto::{
    CreateStudentRequest, DashboardStats, LessonProgressResult, QuizAttemptResult,
    UpdateStudentRequest,
};
use crate::error::{Error, Result};
use crate::models::user::{User, UserRole};
use crate::services::feedback_service::recompute_lesson_rating;
use crate::services::user_service::{NewUser, UserService};
use crate::utils::crypto::hash_password;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
    users: UserService,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        let users = UserService::new(pool.clone());
        Self { pool, users }
    }

    pub async fn list_students(&self) -> Result<Vec<User>> {
        let students = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'student' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn get_student(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = 'student'")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Student not found".to_string()))
    }

    /// Accounts created by an administrator start out verified.
    pub async fn create_student(&self, payload: CreateStudentRequest) -> Result<User> {
        self.users
            .create(NewUser {
                username: &payload.username,
                email: &payload.email,
                full_name: &payload.full_name,
                password: &payload.password,
                role: UserRole::Student,
                grade: payload.grade,
                class_name: payload.class_name.as_deref(),
                is_verified: true,
            })
            .await
    }

    pub async fn update_student(&self, id: i64, payload: UpdateStudentRequest) -> Result<User> {
        let student = self.get_student(id).await?;
        if let Some(email) = payload.email.as_deref() {
            self.users.ensure_email_free(email, student.id).await?;
        }
        let hashed = payload.password.as_deref().map(hash_password).transpose()?;

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                grade = COALESCE($4, grade),
                class_name = COALESCE($5, class_name),
                is_active = COALESCE($6, is_active),
                hashed_password = COALESCE($7, hashed_password),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.full_name)
        .bind(payload.email)
        .bind(payload.grade)
        .bind(payload.class_name)
        .bind(payload.is_active)
        .bind(hashed)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Removes the student with everything they own and refreshes ratings of lessons they reviewed.
    pub async fn delete_student(&self, id: i64) -> Result<()> {
        self.get_student(id).await?;

        let mut tx = self.pool.begin().await?;
        let reviewed: Vec<i64> =
            sqlx::query_scalar("SELECT DISTINCT lesson_id FROM feedbacks WHERE user_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for lesson_id in reviewed {
            recompute_lesson_rating(&mut tx, lesson_id).await?;
        }
        tx.commit().await?;

        tracing::info!(user_id = id, "student deleted");
        Ok(())
    }

    pub async fn lesson_progress(&self) -> Result<Vec<LessonProgressResult>> {
        let rows = sqlx::query_as::<_, LessonProgressResult>(
            r#"
            SELECT
                p.id,
                p.user_id,
                u.full_name AS user_name,
                u.class_name,
                p.lesson_id,
                l.title AS lesson_title,
                p.progress_percentage,
                p.is_completed,
                p.quiz_score,
                p.average_score,
                p.time_spent,
                p.last_accessed,
                p.completed_at
            FROM student_progress p
            JOIN users u ON u.id = p.user_id
            JOIN lessons l ON l.id = p.lesson_id
            ORDER BY p.last_accessed DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn quiz_attempts(&self) -> Result<Vec<QuizAttemptResult>> {
        let rows = sqlx::query_as::<_, QuizAttemptResult>(
            r#"
            SELECT
                a.id,
                a.user_id,
                u.full_name AS user_name,
                a.quiz_id,
                q.title AS quiz_title,
                l.title AS lesson_title,
                a.score,
                a.points_earned,
                a.total_points,
                a.score >= q.passing_score AS passed,
                a.time_spent,
                a.submitted_at
            FROM quiz_attempts a
            JOIN users u ON u.id = a.user_id
            JOIN quizzes q ON q.id = a.quiz_id
            JOIN lessons l ON l.id = q.lesson_id
            ORDER BY a.submitted_at DESC NULLS LAST, a.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'student') AS total_students,
                (SELECT COUNT(*) FROM lessons) AS total_lessons,
                (SELECT COUNT(*) FROM quiz_attempts) AS total_quiz_attempts,
                (SELECT COUNT(*) FROM feedbacks) AS total_feedback,
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos) AS total_video_views
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
