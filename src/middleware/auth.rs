use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError, state::AppState};

/// The caller behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Invalid or expired token".into())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let auth_str = auth_header.to_str().map_err(|_| invalid_token())?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(invalid_token)?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| invalid_token())?;

        let tables = state.db.read().await;
        let user = tables
            .users
            .iter()
            .find(|u| u.username == decoded.claims.sub)
            .ok_or_else(invalid_token)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username.clone(),
        })
    }
}
