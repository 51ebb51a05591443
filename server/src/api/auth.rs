//! Shared-secret gate for rover-originated requests

use super::AppState;
use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use roverlink_shared::protocol;

/// Proof that the request carried the configured API key
///
/// Always succeeds when no key is configured.
pub struct RoverAuth;

#[async_trait]
impl FromRequestParts<AppState> for RoverAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.api_key.as_deref() else {
            return Ok(RoverAuth);
        };

        let supplied = parts
            .headers
            .get(protocol::API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        match supplied {
            Some(key) if key == expected => Ok(RoverAuth),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
