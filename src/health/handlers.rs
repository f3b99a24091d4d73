use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{debug, error, instrument};

use crate::{app::method_not_allowed, state::AppState, users::repo};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(health_check).head(method_not_allowed))
}

fn no_cache(status: StatusCode) -> Response {
    (status, [(header::CACHE_CONTROL, "no-cache")]).into_response()
}

/// Liveness probe. A probe carrying a query string or body is itself
/// malformed and rejected before the store is consulted.
#[instrument(skip(state, body))]
pub async fn health_check(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    debug!("health check initiated");
    if query.is_some() || !body.is_empty() {
        error!("health check request contains a payload");
        return no_cache(StatusCode::BAD_REQUEST);
    }

    if !repo::ping(&state.db).await {
        error!("database is not connected");
        return no_cache(StatusCode::SERVICE_UNAVAILABLE);
    }

    no_cache(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_carry_no_cache_header() {
        for status in [
            StatusCode::OK,
            StatusCode::BAD_REQUEST,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let response = no_cache(status);
            assert_eq!(response.status(), status);
            assert_eq!(
                response.headers().get(header::CACHE_CONTROL).unwrap(),
                "no-cache"
            );
        }
    }
}
