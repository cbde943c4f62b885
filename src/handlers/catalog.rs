// src/handlers/catalog.rs
//
// Dados de referência globais: leitura para qualquer usuário autenticado,
// escrita apenas para o administrador da plataforma.

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
        rbac::{PlatformAdmin, RequireRole},
    },
    models::catalog::{BrandSearch, Tax, TaxPayload, VehicleBrand, VehicleBrandPayload},
};

// =============================================================================
//  IMPOSTOS
// =============================================================================

// POST /api/admin/taxes
#[utoipa::path(
    post,
    path = "/api/admin/taxes",
    tag = "Catalog",
    request_body = TaxPayload,
    responses(
        (status = 201, description = "Imposto cadastrado", body = Tax),
        (status = 400, description = "Dados inválidos ou código duplicado"),
        (status = 403, description = "Apenas administradores da plataforma")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Json(payload): Json<TaxPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tax = app_state
        .catalog_service
        .create_tax(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tax)))
}

// GET /api/admin/taxes
#[utoipa::path(
    get,
    path = "/api/admin/taxes",
    tag = "Catalog",
    responses((status = 200, body = Vec<Tax>)),
    security(("api_jwt" = []))
)]
pub async fn list_taxes(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let taxes = app_state
        .catalog_service
        .list_taxes()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(taxes))
}

// GET /api/admin/taxes/{id}
#[utoipa::path(
    get,
    path = "/api/admin/taxes/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do imposto")),
    responses(
        (status = 200, body = Tax),
        (status = 404, description = "Imposto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tax = app_state
        .catalog_service
        .get_tax(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tax))
}

// GET /api/admin/taxes/by-code/{code}
#[utoipa::path(
    get,
    path = "/api/admin/taxes/by-code/{code}",
    tag = "Catalog",
    params(("code" = String, Path, description = "Código do imposto, ex.: GST18")),
    responses(
        (status = 200, body = Tax),
        (status = 404, description = "Imposto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn tax_by_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tax = app_state
        .catalog_service
        .tax_by_code(&code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tax))
}

// PATCH /api/admin/taxes/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/taxes/{id}",
    tag = "Catalog",
    request_body = TaxPayload,
    params(("id" = Uuid, Path, description = "ID do imposto")),
    responses(
        (status = 200, body = Tax),
        (status = 403, description = "Apenas administradores da plataforma"),
        (status = 404, description = "Imposto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaxPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tax = app_state
        .catalog_service
        .update_tax(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tax))
}

// DELETE /api/admin/taxes/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/taxes/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do imposto")),
    responses(
        (status = 204, description = "Imposto desativado"),
        (status = 403, description = "Apenas administradores da plataforma"),
        (status = 404, description = "Imposto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tax(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_tax(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  MARCAS DE VEÍCULOS
// =============================================================================

// POST /api/admin/vehicle-brands
#[utoipa::path(
    post,
    path = "/api/admin/vehicle-brands",
    tag = "Catalog",
    request_body = VehicleBrandPayload,
    responses(
        (status = 201, description = "Marca cadastrada", body = VehicleBrand),
        (status = 400, description = "Dados inválidos ou nome duplicado"),
        (status = 403, description = "Apenas administradores da plataforma")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Json(payload): Json<VehicleBrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .create_brand(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

// GET /api/admin/vehicle-brands
#[utoipa::path(
    get,
    path = "/api/admin/vehicle-brands",
    tag = "Catalog",
    params(BrandSearch),
    responses((status = 200, body = Vec<VehicleBrand>)),
    security(("api_jwt" = []))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<BrandSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .search_brands(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

// GET /api/admin/vehicle-brands/search
#[utoipa::path(
    get,
    path = "/api/admin/vehicle-brands/search",
    tag = "Catalog",
    params(BrandSearch),
    responses((status = 200, body = Vec<VehicleBrand>)),
    security(("api_jwt" = []))
)]
pub async fn search_brands(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filters): Query<BrandSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .search_brands(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

// GET /api/admin/vehicle-brands/{id}
#[utoipa::path(
    get,
    path = "/api/admin/vehicle-brands/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 200, body = VehicleBrand),
        (status = 404, description = "Marca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = app_state
        .catalog_service
        .get_brand(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}

// PATCH /api/admin/vehicle-brands/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/vehicle-brands/{id}",
    tag = "Catalog",
    request_body = VehicleBrandPayload,
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 200, body = VehicleBrand),
        (status = 403, description = "Apenas administradores da plataforma"),
        (status = 404, description = "Marca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehicleBrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .update_brand(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}

// DELETE /api/admin/vehicle-brands/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/vehicle-brands/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 204, description = "Marca desativada"),
        (status = 403, description = "Apenas administradores da plataforma"),
        (status = 404, description = "Marca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_brand(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
