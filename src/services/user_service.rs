use crate::dto::auth_dto::{ChangePasswordRequest, RegisterRequest, UpdateSettingsRequest};
use crate::error::{Error, Result};
use crate::models::user::{User, UserRole};
use crate::utils::crypto::{hash_password, verify_password};
use sqlx::PgPool;

/// Fields needed to insert a user row; the password is still plain text here.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
    pub role: UserRole,
    pub grade: Option<i32>,
    pub class_name: Option<&'a str>,
    pub is_verified: bool,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        let role = payload.role.unwrap_or_default();
        if role == UserRole::Admin {
            return Err(Error::Forbidden(
                "Cannot self-register as admin".to_string(),
            ));
        }

        self.create(NewUser {
            username: &payload.username,
            email: &payload.email,
            full_name: &payload.full_name,
            password: &payload.password,
            role,
            grade: payload.grade,
            class_name: payload.class_name.as_deref(),
            is_verified: false,
        })
        .await
    }

    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User> {
        if self.find_by_username(new_user.username).await?.is_some() {
            return Err(Error::BadRequest("Username already registered".to_string()));
        }
        if self.find_by_email(new_user.email).await?.is_some() {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let hashed = hash_password(new_user.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, email, full_name, hashed_password, role,
                grade, class_name, is_verified
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.full_name)
        .bind(hashed)
        .bind(new_user.role.as_str())
        .bind(new_user.grade)
        .bind(new_user.class_name)
        .bind(new_user.is_verified)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(user) = self.find_by_username(username).await? else {
            tracing::warn!(username, "login rejected: unknown user");
            return Err(Error::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        };

        if !verify_password(password, &user.hashed_password) {
            tracing::warn!(user_id = user.id, "login rejected: wrong password");
            return Err(Error::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(Error::Forbidden("Account is inactive".to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Fails when `email` belongs to someone other than `user_id`.
    pub async fn ensure_email_free(&self, email: &str, user_id: i64) -> Result<()> {
        match self.find_by_email(email).await? {
            Some(other) if other.id != user_id => {
                Err(Error::BadRequest("Email already taken".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub async fn update_settings(&self, user: &User, payload: UpdateSettingsRequest) -> Result<User> {
        if let Some(email) = payload.email.as_deref() {
            self.ensure_email_free(email, user.id).await?;
        }

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                grade = COALESCE($4, grade),
                class_name = COALESCE($5, class_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(payload.full_name)
        .bind(payload.email)
        .bind(payload.grade)
        .bind(payload.class_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn change_password(&self, user: &User, payload: ChangePasswordRequest) -> Result<()> {
        if !verify_password(&payload.current_password, &user.hashed_password) {
            return Err(Error::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let hashed = hash_password(&payload.new_password)?;
        sqlx::query("UPDATE users SET hashed_password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user.id)
            .bind(hashed)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = user.id, "password changed");
        Ok(())
    }
}
