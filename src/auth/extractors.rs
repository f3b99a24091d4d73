use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Extracts and verifies Basic credentials, yielding the full authenticated
/// user as the request principal. Re-verifies against the store on every
/// request; there is no session or token cache.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user = crate::users::services::authenticate(state, header).await?;
        Ok(AuthUser(user))
    }
}
