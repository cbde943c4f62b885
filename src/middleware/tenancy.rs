// src/middleware/tenancy.rs
//
// Resolução da oficina (tenant) do usuário autenticado. Executada uma única vez
// por requisição pelo `tenant_guard`; os handlers recebem o `SessionContext`
// pronto e o repassam explicitamente aos serviços.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        crud,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::{User, UserRole},
        garage::Garage,
    },
};

/// Quem está chamando e em nome de qual oficina.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub role: UserRole,
    pub garage_id: Uuid,
    pub garage: Garage,
}

/// Parte pura da resolução: principal + oficina carregada.
pub fn build_session(user: Option<&User>, garage: Option<Garage>) -> Result<SessionContext, AppError> {
    let user = user.ok_or(AppError::AuthenticationRequired)?;
    let garage = garage.ok_or(AppError::TenantNotFound)?;

    // A oficina carregada tem que ser a do usuário
    if user.garage_id != Some(garage.id) {
        return Err(AppError::TenantNotFound);
    }

    Ok(SessionContext {
        user_id: user.id,
        role: user.role,
        garage_id: garage.id,
        garage,
    })
}

pub async fn resolve_session<'e, E>(
    executor: E,
    user: Option<&User>,
) -> Result<SessionContext, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let user = user.ok_or(AppError::AuthenticationRequired)?;
    let garage_id = user.garage_id.ok_or(AppError::TenantNotFound)?;

    let garage = crud::find_by_id::<Garage, E>(executor, garage_id).await?;

    build_session(Some(user), garage)
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Só existe em rotas protegidas pelo tenant_guard
        parts.extensions.get::<SessionContext>().cloned().ok_or_else(|| {
            let app_state = AppState::from_ref(state);
            AppError::TenantNotFound
                .to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn garage() -> Garage {
        Garage {
            id: Uuid::new_v4(),
            name: "Patil Auto Works".into(),
            legal_name: None,
            gst_number: None,
            email: None,
            phone: None,
            onboarding_completed: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(garage_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            garage_id,
            email: "owner@garage.in".into(),
            password_hash: String::new(),
            full_name: "Owner".into(),
            phone: None,
            role: UserRole::GarageOwner,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn no_principal_is_authentication_required() {
        let err = build_session(None, Some(garage())).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationRequired));
    }

    #[test]
    fn missing_garage_row_is_tenant_not_found() {
        let user = user(Some(Uuid::new_v4()));
        let err = build_session(Some(&user), None).unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound));
    }

    #[test]
    fn garage_of_someone_else_is_not_accepted() {
        let user = user(Some(Uuid::new_v4()));
        let err = build_session(Some(&user), Some(garage())).unwrap_err();
        assert!(matches!(err, AppError::TenantNotFound));
    }

    #[test]
    fn session_carries_user_and_garage() {
        let garage = garage();
        let user = user(Some(garage.id));

        let session = build_session(Some(&user), Some(garage.clone())).unwrap();

        assert_eq!(session.user_id, user.id);
        assert_eq!(session.garage_id, garage.id);
        assert_eq!(session.role, UserRole::GarageOwner);
    }
}
