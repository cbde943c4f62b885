// src/handlers/vehicles.rs

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
    models::customer::{Vehicle, VehiclePayload, VehicleSearch},
};

// POST /api/admin/vehicles
#[utoipa::path(
    post,
    path = "/api/admin/vehicles",
    tag = "Vehicles",
    request_body = VehiclePayload,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos, placa/chassi duplicado ou cliente de outra oficina")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<VehiclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let vehicle = app_state
        .vehicle_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// GET /api/admin/vehicles/{id}
#[utoipa::path(
    get,
    path = "/api/admin/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, body = Vehicle),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = app_state
        .vehicle_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(vehicle))
}

// GET /api/admin/vehicles/my-vehicles
#[utoipa::path(
    get,
    path = "/api/admin/vehicles/my-vehicles",
    tag = "Vehicles",
    responses((status = 200, body = Vec<Vehicle>)),
    security(("api_jwt" = []))
)]
pub async fn my_vehicles(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = app_state
        .vehicle_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(vehicles))
}

// PATCH /api/admin/vehicles/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/vehicles/{id}",
    tag = "Vehicles",
    request_body = VehiclePayload,
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, body = Vehicle),
        (status = 400, description = "Dados inválidos ou veículo de outra oficina"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehiclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let vehicle = app_state
        .vehicle_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(vehicle))
}

// DELETE /api/admin/vehicles/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 204, description = "Veículo desativado"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .vehicle_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/vehicles/by-customer/{customer_id}
#[utoipa::path(
    get,
    path = "/api/admin/vehicles/by-customer/{customer_id}",
    tag = "Vehicles",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Vec<Vehicle>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn vehicles_by_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = app_state
        .vehicle_service
        .by_customer(&session, customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(vehicles))
}

// GET /api/admin/vehicles/search
#[utoipa::path(
    get,
    path = "/api/admin/vehicles/search",
    tag = "Vehicles",
    params(VehicleSearch),
    responses((status = 200, body = Vec<Vehicle>)),
    security(("api_jwt" = []))
)]
pub async fn search_vehicles(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filters): Query<VehicleSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = app_state
        .vehicle_service
        .search(&session, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(vehicles))
}
