// src/handlers/onboarding.rs
//
// Exige login, mas não oficina: é aqui que a oficina nasce.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::onboarding::{CompleteOnboardingPayload, NextStep, OnboardingResult, OnboardingStatus},
};

// POST /api/admin/onboarding/complete
#[utoipa::path(
    post,
    path = "/api/admin/onboarding/complete",
    tag = "Onboarding",
    request_body = CompleteOnboardingPayload,
    responses(
        (status = 201, description = "Oficina criada e configurada", body = OnboardingResult),
        (status = 400, description = "Dados inválidos ou onboarding já concluído")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_onboarding(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CompleteOnboardingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Validação aninhada antes de qualquer escrita
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .onboarding_service
        .complete(&user, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(result)))
}

// GET /api/admin/onboarding/status
#[utoipa::path(
    get,
    path = "/api/admin/onboarding/status",
    tag = "Onboarding",
    responses((status = 200, body = OnboardingStatus)),
    security(("api_jwt" = []))
)]
pub async fn onboarding_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let status = app_state
        .onboarding_service
        .status(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(status))
}

// GET /api/admin/onboarding/next-step
#[utoipa::path(
    get,
    path = "/api/admin/onboarding/next-step",
    tag = "Onboarding",
    responses((status = 200, body = NextStep)),
    security(("api_jwt" = []))
)]
pub async fn next_step(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let step = app_state
        .onboarding_service
        .next_step(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(step))
}
