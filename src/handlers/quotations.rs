// src/handlers/quotations.rs

use axum::{
    extract::{Path, Query, State},
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
    models::quotation::{Quotation, QuotationPayload, QuotationSearch, QuotationStatusPayload},
};

// POST /api/admin/quotations
#[utoipa::path(
    post,
    path = "/api/admin/quotations",
    tag = "Quotations",
    request_body = QuotationPayload,
    responses(
        (status = 201, description = "Orçamento criado (rascunho)", body = Quotation),
        (status = 400, description = "Dados inválidos ou referência de outra oficina")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quotation(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<QuotationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quotation = app_state
        .quotation_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quotation)))
}

// GET /api/admin/quotations/{id}
#[utoipa::path(
    get,
    path = "/api/admin/quotations/{id}",
    tag = "Quotations",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, body = Quotation),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quotation(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quotation = app_state
        .quotation_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quotation))
}

// GET /api/admin/quotations/my-quotations
#[utoipa::path(
    get,
    path = "/api/admin/quotations/my-quotations",
    tag = "Quotations",
    responses((status = 200, body = Vec<Quotation>)),
    security(("api_jwt" = []))
)]
pub async fn my_quotations(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let quotations = app_state
        .quotation_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quotations))
}

// PATCH /api/admin/quotations/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/quotations/{id}",
    tag = "Quotations",
    request_body = QuotationPayload,
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento atualizado, totais recalculados", body = Quotation),
        (status = 400, description = "Dados inválidos ou orçamento fora de rascunho"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quotation(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuotationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quotation = app_state
        .quotation_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quotation))
}

// DELETE /api/admin/quotations/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/quotations/{id}",
    tag = "Quotations",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 204, description = "Rascunho removido"),
        (status = 400, description = "Orçamento fora de rascunho"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quotation(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .quotation_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/admin/quotations/{id}/status
#[utoipa::path(
    patch,
    path = "/api/admin/quotations/{id}/status",
    tag = "Quotations",
    request_body = QuotationStatusPayload,
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, body = Quotation),
        (status = 400, description = "Transição de status não permitida"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_quotation_status(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuotationStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let quotation = app_state
        .quotation_service
        .change_status(&session, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quotation))
}

// GET /api/admin/quotations/search
#[utoipa::path(
    get,
    path = "/api/admin/quotations/search",
    tag = "Quotations",
    params(QuotationSearch),
    responses((status = 200, body = Vec<Quotation>)),
    security(("api_jwt" = []))
)]
pub async fn search_quotations(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filters): Query<QuotationSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let quotations = app_state
        .quotation_service
        .search(&session, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quotations))
}
