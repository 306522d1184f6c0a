use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::errors::AppError;
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extractor guarding `/api/admin/*` handlers.
///
/// Accepts `x-admin-token: <token>` or `Authorization: Bearer <token>`.
/// Missing credentials are 401; a wrong token, or no `ADMIN_TOKEN`
/// configured at all, is 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let presented = presented_token(parts).ok_or(AppError::Unauthorized)?;

        match state.config.admin_token.as_deref() {
            Some(expected) if expected == presented => Ok(AdminAuth),
            Some(_) => {
                tracing::warn!("Rejected admin request with invalid token");
                Err(AppError::Forbidden)
            }
            None => Err(AppError::Forbidden),
        }
    }
}

fn presented_token(parts: &Parts) -> Option<&str> {
    if let Some(token) = parts
        .headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.trim()).filter(|t| !t.is_empty());
    }
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
