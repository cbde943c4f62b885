// src/handlers/customers.rs

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
    models::{
        address::{LinkAddressPayload, LinkedAddress},
        customer::{Customer, CustomerPayload, CustomerSearch},
    },
};

// =============================================================================
//  CLIENTES
// =============================================================================

// POST /api/admin/customers
#[utoipa::path(
    post,
    path = "/api/admin/customers",
    tag = "Customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .customer_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/admin/customers/{id}
#[utoipa::path(
    get,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .customer_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customer))
}

// GET /api/admin/customers/my-customers
#[utoipa::path(
    get,
    path = "/api/admin/customers/my-customers",
    tag = "Customers",
    responses((status = 200, body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn my_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .customer_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customers))
}

// PATCH /api/admin/customers/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    request_body = CustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Customer),
        (status = 400, description = "Dados inválidos ou cliente de outra oficina"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .customer_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customer))
}

// DELETE /api/admin/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente desativado"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/customers/search
#[utoipa::path(
    get,
    path = "/api/admin/customers/search",
    tag = "Customers",
    params(CustomerSearch),
    responses((status = 200, body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn search_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filters): Query<CustomerSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .customer_service
        .search(&session, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(customers))
}

// =============================================================================
//  ENDEREÇOS DO CLIENTE
// =============================================================================

// POST /api/admin/customers/{id}/addresses
#[utoipa::path(
    post,
    path = "/api/admin/customers/{id}/addresses",
    tag = "Customers",
    request_body = LinkAddressPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 201, description = "Endereço vinculado", body = LinkedAddress),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_customer_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkAddressPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let linked = app_state
        .customer_service
        .add_address(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(linked)))
}

// GET /api/admin/customers/{id}/addresses
#[utoipa::path(
    get,
    path = "/api/admin/customers/{id}/addresses",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, body = Vec<LinkedAddress>)),
    security(("api_jwt" = []))
)]
pub async fn list_customer_addresses(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .customer_service
        .list_addresses(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(addresses))
}

// DELETE /api/admin/customers/{id}/addresses/{address_id}
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}/addresses/{address_id}",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("address_id" = Uuid, Path, description = "ID do endereço")
    ),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_customer_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path((id, address_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customer_service
        .remove_address(&session, id, address_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
