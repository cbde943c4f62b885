// src/handlers/maintenance.rs

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
    models::maintenance::{MaintenancePayload, MaintenanceSchedule, MaintenanceSearch, UpcomingQuery},
};

// POST /api/admin/maintenance-schedules
#[utoipa::path(
    post,
    path = "/api/admin/maintenance-schedules",
    tag = "Maintenance",
    request_body = MaintenancePayload,
    responses(
        (status = 201, description = "Manutenção agendada", body = MaintenanceSchedule),
        (status = 400, description = "Dados inválidos ou veículo de outra oficina")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<MaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let schedule = app_state
        .maintenance_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

// GET /api/admin/maintenance-schedules/{id}
#[utoipa::path(
    get,
    path = "/api/admin/maintenance-schedules/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, body = MaintenanceSchedule),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = app_state
        .maintenance_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedule))
}

// GET /api/admin/maintenance-schedules/my-schedules
#[utoipa::path(
    get,
    path = "/api/admin/maintenance-schedules/my-schedules",
    tag = "Maintenance",
    responses((status = 200, body = Vec<MaintenanceSchedule>)),
    security(("api_jwt" = []))
)]
pub async fn my_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .maintenance_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedules))
}

// PATCH /api/admin/maintenance-schedules/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/maintenance-schedules/{id}",
    tag = "Maintenance",
    request_body = MaintenancePayload,
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, body = MaintenanceSchedule),
        (status = 400, description = "Dados inválidos ou agendamento de outra oficina"),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let schedule = app_state
        .maintenance_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedule))
}

// DELETE /api/admin/maintenance-schedules/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/maintenance-schedules/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 204, description = "Agendamento removido"),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .maintenance_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/admin/maintenance-schedules/{id}/complete
#[utoipa::path(
    patch,
    path = "/api/admin/maintenance-schedules/{id}/complete",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, body = MaintenanceSchedule),
        (status = 400, description = "Agendamento já encerrado"),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = app_state
        .maintenance_service
        .complete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedule))
}

// GET /api/admin/maintenance-schedules/upcoming?days=7
#[utoipa::path(
    get,
    path = "/api/admin/maintenance-schedules/upcoming",
    tag = "Maintenance",
    params(UpcomingQuery),
    responses((status = 200, body = Vec<MaintenanceSchedule>)),
    security(("api_jwt" = []))
)]
pub async fn upcoming_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(query): Query<UpcomingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .maintenance_service
        .upcoming(&session, query.window_days())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedules))
}

// GET /api/admin/maintenance-schedules/by-vehicle/{vehicle_id}
#[utoipa::path(
    get,
    path = "/api/admin/maintenance-schedules/by-vehicle/{vehicle_id}",
    tag = "Maintenance",
    params(("vehicle_id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, body = Vec<MaintenanceSchedule>),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedules_by_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .maintenance_service
        .by_vehicle(&session, vehicle_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedules))
}

// GET /api/admin/maintenance-schedules/search
#[utoipa::path(
    get,
    path = "/api/admin/maintenance-schedules/search",
    tag = "Maintenance",
    params(MaintenanceSearch),
    responses((status = 200, body = Vec<MaintenanceSchedule>)),
    security(("api_jwt" = []))
)]
pub async fn search_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filters): Query<MaintenanceSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .maintenance_service
        .search(&session, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(schedules))
}
