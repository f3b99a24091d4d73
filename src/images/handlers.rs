use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{instrument, warn};

use crate::{
    app::method_not_allowed,
    auth::extractors::AuthUser,
    error::ApiError,
    images::{repo::Image, services},
    state::AppState,
};

pub fn pic_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/user/self/pic",
            post(upload_pic)
                .get(get_pic)
                .delete(delete_pic)
                .head(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
}

struct UploadField {
    file_name: String,
    content_type: String,
    body: Bytes,
}

/// Pull the `profilePic` part out of the multipart body.
async fn profile_pic_field(mp: &mut Multipart) -> Result<UploadField, ApiError> {
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() != Some("profilePic") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "profile".into());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field.bytes().await.map_err(|e| {
            warn!(error = %e, "failed to read multipart field");
            ApiError::InvalidImage
        })?;
        return Ok(UploadField {
            file_name,
            content_type,
            body,
        });
    }
    warn!("multipart body without profilePic field");
    Err(ApiError::InvalidImage)
}

#[instrument(skip(state, user, mp))]
pub async fn upload_pic(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<Image>), ApiError> {
    let field = profile_pic_field(&mut mp).await?;

    if !services::is_image_valid(
        &field.content_type,
        field.body.len(),
        state.config.max_image_bytes,
    ) {
        warn!(user_id = %user.id, content_type = %field.content_type, "invalid image");
        return Err(ApiError::InvalidImage);
    }

    let image = services::add_image(
        &state,
        user.id,
        &field.file_name,
        &field.content_type,
        field.body,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

#[instrument(skip(state, user))]
pub async fn get_pic(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Image>, ApiError> {
    let image = services::get_image(&state, user.id)
        .await?
        .ok_or(ApiError::ImageNotFound)?;
    Ok(Json(image))
}

#[instrument(skip(state, user))]
pub async fn delete_pic(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, ApiError> {
    let image = services::get_image(&state, user.id)
        .await?
        .ok_or(ApiError::ImageNotFound)?;

    services::delete_image(&state, &image).await?;
    Ok(StatusCode::NO_CONTENT)
}
