use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    app::method_not_allowed,
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/user", post(create_user).head(method_not_allowed))
        .route(
            "/v1/user/self",
            get(get_self).put(update_self).head(method_not_allowed),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = services::create_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[instrument(skip(user))]
pub async fn get_self(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[instrument(skip(state, user, payload))]
pub async fn update_self(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    services::update_user(&state, &user, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
