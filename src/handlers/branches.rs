// src/handlers/branches.rs

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
    middleware::{
        i18n::Locale,
        rbac::{GarageManagement, RequireRole},
        tenancy::SessionContext,
    },
    models::{
        address::{LinkAddressPayload, LinkedAddress},
        garage::{Branch, BranchPayload},
    },
};

// POST /api/admin/branches
#[utoipa::path(
    post,
    path = "/api/admin/branches",
    tag = "Branches",
    request_body = BranchPayload,
    responses(
        (status = 201, description = "Filial criada", body = Branch),
        (status = 400, description = "Dados inválidos ou código duplicado"),
        (status = 403, description = "Apenas dono ou gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Json(payload): Json<BranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .branch_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(branch)))
}

// GET /api/admin/branches/{id}
#[utoipa::path(
    get,
    path = "/api/admin/branches/{id}",
    tag = "Branches",
    params(("id" = Uuid, Path, description = "ID da filial")),
    responses(
        (status = 200, body = Branch),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let branch = app_state
        .branch_service
        .get(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(branch))
}

// GET /api/admin/branches/my-branches
#[utoipa::path(
    get,
    path = "/api/admin/branches/my-branches",
    tag = "Branches",
    responses((status = 200, body = Vec<Branch>)),
    security(("api_jwt" = []))
)]
pub async fn my_branches(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let branches = app_state
        .branch_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(branches))
}

// PATCH /api/admin/branches/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/branches/{id}",
    tag = "Branches",
    request_body = BranchPayload,
    params(("id" = Uuid, Path, description = "ID da filial")),
    responses(
        (status = 200, body = Branch),
        (status = 400, description = "Dados inválidos ou filial de outra oficina"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .branch_service
        .update(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(branch))
}

// DELETE /api/admin/branches/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/branches/{id}",
    tag = "Branches",
    params(("id" = Uuid, Path, description = "ID da filial")),
    responses(
        (status = 204, description = "Filial desativada"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Filial não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .branch_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- Endereços da filial ---

// POST /api/admin/branches/{id}/addresses
#[utoipa::path(
    post,
    path = "/api/admin/branches/{id}/addresses",
    tag = "Branches",
    request_body = LinkAddressPayload,
    params(("id" = Uuid, Path, description = "ID da filial")),
    responses(
        (status = 201, description = "Endereço vinculado", body = LinkedAddress),
        (status = 403, description = "Apenas dono ou gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_branch_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkAddressPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let linked = app_state
        .branch_service
        .add_address(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(linked)))
}

// GET /api/admin/branches/{id}/addresses
#[utoipa::path(
    get,
    path = "/api/admin/branches/{id}/addresses",
    tag = "Branches",
    params(("id" = Uuid, Path, description = "ID da filial")),
    responses((status = 200, body = Vec<LinkedAddress>)),
    security(("api_jwt" = []))
)]
pub async fn list_branch_addresses(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .branch_service
        .list_addresses(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(addresses))
}

// DELETE /api/admin/branches/{id}/addresses/{address_id}
#[utoipa::path(
    delete,
    path = "/api/admin/branches/{id}/addresses/{address_id}",
    tag = "Branches",
    params(
        ("id" = Uuid, Path, description = "ID da filial"),
        ("address_id" = Uuid, Path, description = "ID do endereço")
    ),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_branch_address(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path((id, address_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .branch_service
        .remove_address(&session, id, address_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
