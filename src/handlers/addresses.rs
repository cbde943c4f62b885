// src/handlers/addresses.rs

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
    models::address::{Address, AddressPayload, AddressSearch},
};

// POST /api/admin/addresses
#[utoipa::path(
    post,
    path = "/api/admin/addresses",
    tag = "Addresses",
    request_body = AddressPayload,
    responses(
        (status = 201, description = "Endereço criado", body = Address),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<AddressPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let address = app_state
        .address_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(address)))
}

// GET /api/admin/addresses/{id}
#[utoipa::path(
    get,
    path = "/api/admin/addresses/{id}",
    tag = "Addresses",
    params(("id" = Uuid, Path, description = "ID do endereço")),
    responses(
        (status = 200, body = Address),
        (status = 404, description = "Endereço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let address = app_state
        .address_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(address))
}

// GET /api/admin/addresses/my-addresses
#[utoipa::path(
    get,
    path = "/api/admin/addresses/my-addresses",
    tag = "Addresses",
    responses((status = 200, body = Vec<Address>)),
    security(("api_jwt" = []))
)]
pub async fn my_addresses(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .address_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(addresses))
}

// PATCH /api/admin/addresses/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/addresses/{id}",
    tag = "Addresses",
    request_body = AddressPayload,
    params(("id" = Uuid, Path, description = "ID do endereço")),
    responses(
        (status = 200, body = Address),
        (status = 400, description = "Dados inválidos ou endereço de outra oficina"),
        (status = 404, description = "Endereço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let address = app_state
        .address_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(address))
}

// DELETE /api/admin/addresses/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/addresses/{id}",
    tag = "Addresses",
    params(("id" = Uuid, Path, description = "ID do endereço")),
    responses(
        (status = 204, description = "Endereço removido"),
        (status = 404, description = "Endereço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .address_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/addresses/search
#[utoipa::path(
    get,
    path = "/api/admin/addresses/search",
    tag = "Addresses",
    params(AddressSearch),
    responses((status = 200, body = Vec<Address>)),
    security(("api_jwt" = []))
)]
pub async fn search_addresses(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filters): Query<AddressSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .address_service
        .search(&session, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(addresses))
}
