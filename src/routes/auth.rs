use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{
            ChangePasswordRequest, LoginRequest, RegisterRequest, TokenResponse,
            UpdateSettingsRequest, UserResponse, VerifyResponse,
        },
        MessageResponse,
    },
    error::{Error, Result},
    extract::{FormBody, JsonBody},
    models::user::User,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = Json<UserResponse>),
        (status = 400, description = "Username or email already registered"),
        (status = 403, description = "Admin self-registration or registration disabled")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !state.settings_service.registration_open()? {
        return Err(Error::Forbidden("Registration is disabled".to_string()));
    }
    let user = state.user_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = Json<TokenResponse>),
        (status = 401, description = "Incorrect username or password"),
        (status = 403, description = "Account is inactive")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse> {
    Ok(Json(issue_token(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/auth/login/form",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = Json<TokenResponse>),
        (status = 401, description = "Incorrect username or password")
    )
)]
#[axum::debug_handler]
pub async fn login_form(
    State(state): State<AppState>,
    FormBody(payload): FormBody<LoginRequest>,
) -> Result<impl IntoResponse> {
    Ok(Json(issue_token(&state, payload).await?))
}

async fn issue_token(state: &AppState, payload: LoginRequest) -> Result<TokenResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .authenticate(&payload.username, &payload.password)
        .await?;
    let access_token = state.tokens.issue(&user)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserResponse::from(user),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = Json<MessageResponse>))
)]
#[axum::debug_handler]
pub async fn logout(Extension(user): Extension<User>) -> Result<impl IntoResponse> {
    tracing::info!(user_id = user.id, "user logged out");
    Ok(Json(MessageResponse::new("Successfully logged out")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = Json<UserResponse>),
        (status = 401, description = "Could not validate credentials")
    )
)]
#[axum::debug_handler]
pub async fn me(Extension(user): Extension<User>) -> Result<impl IntoResponse> {
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses((status = 200, description = "Token is valid", body = Json<VerifyResponse>))
)]
#[axum::debug_handler]
pub async fn verify(Extension(user): Extension<User>) -> Result<impl IntoResponse> {
    Ok(Json(VerifyResponse {
        valid: true,
        user_id: user.id,
        username: user.username,
        role: user.role,
        is_active: user.is_active,
    }))
}

#[utoipa::path(
    put,
    path = "/api/auth/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = Json<UserResponse>),
        (status = 400, description = "Email already taken")
    )
)]
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<UpdateSettingsRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state.user_service.update_settings(&user, payload).await?;
    Ok(Json(UserResponse::from(updated)))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = Json<MessageResponse>),
        (status = 400, description = "Current password is incorrect")
    )
)]
#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.user_service.change_password(&user, payload).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
