// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::Profile};

// O middleware em si: valida o Bearer token e pendura o perfil nos
// extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let profile = app_state.auth_service.validate_token(token).await?;
            request.extensions_mut().insert(profile);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

/// Extrator para obter o perfil autenticado diretamente nos handlers.
pub struct CurrentProfile(pub Profile);

impl<S> FromRequestParts<S> for CurrentProfile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(CurrentProfile)
            .ok_or(AppError::InvalidToken)
    }
}
