//! Session extractor.
//!
//! Validates the session token and resolves it to an active portal user.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::PortalUser;
use persistence::repositories::UserRepository;
use shared::jwt::{extract_user_id, JwtError};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::get_request_id;
use crate::services::cookies::session_token;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PortalUser);

impl std::ops::Deref for CurrentUser {
    type Target = PortalUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn token_rejection(err: JwtError) -> ApiError {
    match err {
        JwtError::TokenExpired => ApiError::Unauthorized("Session expired".to_string()),
        _ => ApiError::Unauthorized("Invalid session token".to_string()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let (token, source) = session_token(&parts.headers, &state.config.session.cookie_name)
            .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

        let claims = state.jwt.validate_session_token(token).map_err(|e| {
            tracing::debug!(
                request_id = %get_request_id(&parts.extensions),
                source = source.as_str(),
                error = %e,
                "Session token rejected"
            );
            token_rejection(e)
        })?;
        let user_id = extract_user_id(&claims).map_err(token_rejection)?;

        let entity = UserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

        let user: PortalUser = entity.into();
        if !user.is_active {
            tracing::info!(user_id = %user.id, "Inactive user rejected");
            return Err(ApiError::Unauthorized("User is inactive".to_string()));
        }

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
