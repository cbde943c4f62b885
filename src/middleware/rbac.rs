// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::UserRole,
};

/// 1. O Trait que define quem pode passar
pub trait RolePolicy: Send + Sync + 'static {
    const NAME: &'static str;
    fn allows(role: UserRole) -> bool;
}

/// 2. O Extractor (Guardião). Deve vir depois do auth_guard/tenant_guard.
pub struct RequireRole<P>(pub PhantomData<P>);

impl<P, S> FromRequestParts<S> for RequireRole<P>
where
    P: RolePolicy,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| {
                AppError::AuthenticationRequired.to_api_error(&locale, &app_state.i18n_store)
            })?;

        if !P::allows(user.0.role) {
            tracing::warn!(
                user_id = %user.0.id,
                role = ?user.0.role,
                policy = P::NAME,
                "🚫 Acesso negado"
            );
            return Err(AppError::Forbidden(P::NAME.to_string())
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// POLÍTICAS
// ---

/// Dados de referência globais (impostos, marcas).
pub struct PlatformAdmin;
impl RolePolicy for PlatformAdmin {
    const NAME: &'static str = "platform_admin";
    fn allows(role: UserRole) -> bool {
        role == UserRole::PlatformAdmin
    }
}

/// Equipe, filiais e dados financeiros da oficina.
pub struct GarageManagement;
impl RolePolicy for GarageManagement {
    const NAME: &'static str = "garage_management";
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::GarageOwner | UserRole::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserRole::PlatformAdmin, true)]
    #[case(UserRole::GarageOwner, false)]
    #[case(UserRole::Staff, false)]
    fn platform_admin_policy(#[case] role: UserRole, #[case] allowed: bool) {
        assert_eq!(PlatformAdmin::allows(role), allowed);
    }

    #[rstest]
    #[case(UserRole::GarageOwner, true)]
    #[case(UserRole::Manager, true)]
    #[case(UserRole::Staff, false)]
    #[case(UserRole::PlatformAdmin, false)]
    fn garage_management_policy(#[case] role: UserRole, #[case] allowed: bool) {
        assert_eq!(GarageManagement::allows(role), allowed);
    }
}
