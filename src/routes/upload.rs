use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::{upload_dto::UploadResponse, MessageResponse},
    error::{Error, Result},
    middleware::auth::require_teacher_or_admin,
    models::user::User,
    services::upload_service::UploadKind,
    AppState,
};

/// Pulls the `file` field out of the form; other fields are ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, bytes::Bytes)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            if filename.is_empty() && data.is_empty() {
                break;
            }
            return Ok((filename, data));
        }
    }
    Err(Error::BadRequest("No file provided".to_string()))
}

async fn upload(
    state: &AppState,
    user: &User,
    kind: UploadKind,
    mut multipart: Multipart,
) -> Result<UploadResponse> {
    require_teacher_or_admin(user)?;
    let (filename, data) = read_file_field(&mut multipart).await?;
    state.upload_service.save(kind, &filename, data).await
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    responses(
        (status = 200, description = "Image stored", body = Json<UploadResponse>),
        (status = 400, description = "Missing file, wrong type or too large")
    )
)]
#[axum::debug_handler]
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let saved = upload(&state, &user, UploadKind::Image, multipart).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    post,
    path = "/api/upload/video",
    responses(
        (status = 200, description = "Video stored", body = Json<UploadResponse>),
        (status = 400, description = "Missing file, wrong type or too large")
    )
)]
#[axum::debug_handler]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let saved = upload(&state, &user, UploadKind::Video, multipart).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/upload/{file_type}/{filename}",
    params(
        ("file_type" = String, Path, description = "images or videos"),
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File deleted", body = Json<MessageResponse>),
        (status = 400, description = "Invalid file type or filename"),
        (status = 404, description = "File not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_upload(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((file_type, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    require_teacher_or_admin(&user)?;
    state.upload_service.delete(&file_type, &filename).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
