// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::resolve_session},
    models::auth::User,
};

// Usuário autenticado, disponível nos "extensions" da requisição
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .ok_or(AppError::AuthenticationRequired)
}

async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers)?;
    app_state.auth_service.validate_token(&token).await
}

/// Rotas que exigem apenas login (perfil, onboarding).
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let user = authenticate(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Login + oficina do usuário. Resolve o `SessionContext` uma única vez.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let user = authenticate(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let session = resolve_session(&app_state.db_pool, Some(&user))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::debug!(user_id = %session.user_id, garage_id = %session.garage_id, "sessão resolvida");

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthenticatedUser>().cloned().ok_or_else(|| {
            let app_state = AppState::from_ref(state);
            AppError::AuthenticationRequired
                .to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn reads_the_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_requires_authentication() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationRequired));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(bearer_token(&headers).is_err());
    }
}
