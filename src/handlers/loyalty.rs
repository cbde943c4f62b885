// src/handlers/loyalty.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::SessionContext},
    models::loyalty::{EnrollPayload, LoyaltyProgram, LoyaltySummary, PointsPayload},
};

// POST /api/admin/loyalty
#[utoipa::path(
    post,
    path = "/api/admin/loyalty",
    tag = "Loyalty",
    request_body = EnrollPayload,
    responses(
        (status = 201, description = "Cliente inscrito no programa", body = LoyaltyProgram),
        (status = 400, description = "Cliente já inscrito ou de outra oficina")
    ),
    security(("api_jwt" = []))
)]
pub async fn enroll(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<EnrollPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let program = app_state
        .loyalty_service
        .enroll(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(program)))
}

// GET /api/admin/loyalty/{id}
#[utoipa::path(
    get,
    path = "/api/admin/loyalty/{id}",
    tag = "Loyalty",
    params(("id" = Uuid, Path, description = "ID do programa")),
    responses(
        (status = 200, body = LoyaltyProgram),
        (status = 404, description = "Programa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_program(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let program = app_state
        .loyalty_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(program))
}

// GET /api/admin/loyalty/by-customer/{customer_id}
#[utoipa::path(
    get,
    path = "/api/admin/loyalty/by-customer/{customer_id}",
    tag = "Loyalty",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = LoyaltyProgram),
        (status = 404, description = "Cliente não inscrito")
    ),
    security(("api_jwt" = []))
)]
pub async fn program_by_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let program = app_state
        .loyalty_service
        .by_customer(&session, customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(program))
}

// GET /api/admin/loyalty/my-programs
#[utoipa::path(
    get,
    path = "/api/admin/loyalty/my-programs",
    tag = "Loyalty",
    responses((status = 200, body = Vec<LoyaltyProgram>)),
    security(("api_jwt" = []))
)]
pub async fn my_programs(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let programs = app_state
        .loyalty_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(programs))
}

// PATCH /api/admin/loyalty/{id}/earn
#[utoipa::path(
    patch,
    path = "/api/admin/loyalty/{id}/earn",
    tag = "Loyalty",
    request_body = PointsPayload,
    params(("id" = Uuid, Path, description = "ID do programa")),
    responses(
        (status = 200, description = "Pontos creditados (faixa recalculada)", body = LoyaltyProgram),
        (status = 404, description = "Programa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn earn_points(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PointsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let program = app_state
        .loyalty_service
        .earn_points(&session, id, payload.points)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(program))
}

// PATCH /api/admin/loyalty/{id}/redeem
#[utoipa::path(
    patch,
    path = "/api/admin/loyalty/{id}/redeem",
    tag = "Loyalty",
    request_body = PointsPayload,
    params(("id" = Uuid, Path, description = "ID do programa")),
    responses(
        (status = 200, body = LoyaltyProgram),
        (status = 400, description = "Saldo insuficiente"),
        (status = 404, description = "Programa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_points(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PointsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let program = app_state
        .loyalty_service
        .redeem_points(&session, id, payload.points)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(program))
}

// DELETE /api/admin/loyalty/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/loyalty/{id}",
    tag = "Loyalty",
    params(("id" = Uuid, Path, description = "ID do programa")),
    responses(
        (status = 204, description = "Programa desativado"),
        (status = 404, description = "Programa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_program(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .loyalty_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/loyalty/summary
#[utoipa::path(
    get,
    path = "/api/admin/loyalty/summary",
    tag = "Loyalty",
    responses((status = 200, body = LoyaltySummary)),
    security(("api_jwt" = []))
)]
pub async fn loyalty_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .loyalty_service
        .summary(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
