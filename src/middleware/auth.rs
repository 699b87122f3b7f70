use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{Error, Result},
    models::user::{User, UserRole},
    AppState,
};

fn invalid_credentials() -> Error {
    Error::Unauthorized("Could not validate credentials".to_string())
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token to an active user and stores it in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&req).ok_or_else(invalid_credentials)?;
    let claims = state.tokens.decode(token).map_err(|_| invalid_credentials())?;
    let user_id = claims.user_id().ok_or_else(invalid_credentials)?;

    let user = state
        .user_service
        .get_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(invalid_credentials)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Must run after `require_auth`.
pub async fn require_admin_user(req: Request, next: Next) -> Result<Response> {
    let user = req
        .extensions()
        .get::<User>()
        .ok_or_else(invalid_credentials)?;
    require_admin(user)?;
    Ok(next.run(req).await)
}

pub fn require_admin(user: &User) -> Result<()> {
    if user.role() == UserRole::Admin {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Not enough permissions. Admin access required".to_string(),
        ))
    }
}

pub fn require_teacher_or_admin(user: &User) -> Result<()> {
    match user.role() {
        UserRole::Admin | UserRole::Teacher => Ok(()),
        UserRole::Student => Err(Error::Forbidden(
            "Not enough permissions. Teacher or admin access required".to_string(),
        )),
    }
}

pub fn require_student(user: &User) -> Result<()> {
    if user.role() == UserRole::Student {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Not enough permissions. Student access required".to_string(),
        ))
    }
}
