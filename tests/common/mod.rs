#![allow(dead_code)]

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use math_learning_backend::{
    config::init_config,
    database::pool::{create_pool, run_migrations},
    models::user::UserRole,
    routes,
    services::user_service::{NewUser, UserService},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
}

/// Builds the real router against `DATABASE_URL`; `None` means no database, so the test is skipped.
pub async fn setup() -> Option<TestApp> {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    }
    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "test_secret_key");
    }
    env::set_var(
        "UPLOAD_DIR",
        env::temp_dir().join("math-learning-test-uploads"),
    );
    env::set_var("DATABASE_MAX_CONNECTIONS", "5");

    let _ = init_config();
    let pool = create_pool().await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let app = routes::router(AppState::new(pool.clone()));
    Some(TestApp { app, pool })
}

pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

impl TestApp {
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, JsonValue) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, body)
    }

    /// Registers a user through the API and returns an access token for it.
    pub async fn register_and_login(&self, role: &str) -> (i64, String) {
        let username = unique(role);
        let (status, user) = self
            .call(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "full_name": "Test User",
                    "password": "secret123",
                    "role": role,
                    "grade": 7
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", user);
        let token = self.login(&username, "secret123").await;
        (user["id"].as_i64().unwrap(), token)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Admins cannot self-register, so they are inserted directly.
    pub async fn admin_token(&self) -> String {
        let username = unique("admin");
        let email = format!("{}@example.com", username);
        UserService::new(self.pool.clone())
            .create(NewUser {
                username: &username,
                email: &email,
                full_name: "Admin",
                password: "secret123",
                role: UserRole::Admin,
                grade: None,
                class_name: None,
                is_verified: true,
            })
            .await
            .expect("create admin");
        self.login(&username, "secret123").await
    }

    pub async fn create_lesson(&self, teacher_token: &str) -> i64 {
        let slug = unique("lesson");
        let (status, lesson) = self
            .call(
                "POST",
                "/api/lessons",
                Some(teacher_token),
                Some(json!({
                    "title": "Linear equations",
                    "slug": slug,
                    "grade": 8,
                    "duration": 45,
                    "difficulty": "easy",
                    "is_published": true
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", lesson);
        lesson["id"].as_i64().unwrap()
    }
}
