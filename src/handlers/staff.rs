// src/handlers/staff.rs

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
    middleware::{
        i18n::Locale,
        rbac::{GarageManagement, RequireRole},
        tenancy::SessionContext,
    },
    models::staff::{Staff, StaffPage, StaffPayload, StaffQuery},
};

// POST /api/admin/staff
#[utoipa::path(
    post,
    path = "/api/admin/staff",
    tag = "Staff",
    request_body = StaffPayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = Staff),
        (status = 400, description = "Dados inválidos ou e-mail duplicado"),
        (status = 403, description = "Apenas dono ou gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Json(payload): Json<StaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let staff = app_state
        .staff_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// GET /api/admin/staff?page=0&size=20&role=MECHANIC
#[utoipa::path(
    get,
    path = "/api/admin/staff",
    tag = "Staff",
    params(StaffQuery),
    responses((status = 200, description = "Página de funcionários (ativos e inativos)", body = StaffPage)),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(query): Query<StaffQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .staff_service
        .page(&session, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// GET /api/admin/staff/{id}
#[utoipa::path(
    get,
    path = "/api/admin/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, body = Staff),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = app_state
        .staff_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(staff))
}

// PATCH /api/admin/staff/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/staff/{id}",
    tag = "Staff",
    request_body = StaffPayload,
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, body = Staff),
        (status = 400, description = "Dados inválidos ou funcionário de outra oficina"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let staff = app_state
        .staff_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(staff))
}

// DELETE /api/admin/staff/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 204, description = "Funcionário desativado"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .staff_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
