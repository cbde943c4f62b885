// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
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
    models::finance::{
        BankAccount, BankAccountPayload, DailySnapshot, DateRangeQuery, PaymentMethod,
        PaymentMethodFilter, PaymentMethodPayload, SnapshotDateQuery, SnapshotSummary,
    },
};

// =============================================================================
//  1. FORMAS DE PAGAMENTO
// =============================================================================

// POST /api/admin/payment-methods
#[utoipa::path(
    post,
    path = "/api/admin/payment-methods",
    tag = "Finance",
    request_body = PaymentMethodPayload,
    responses(
        (status = 201, description = "Forma de pagamento criada", body = PaymentMethod),
        (status = 400, description = "Dados inválidos ou nome duplicado"),
        (status = 403, description = "Apenas dono ou gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Json(payload): Json<PaymentMethodPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let method = app_state
        .finance_service
        .create_payment_method(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(method)))
}

// GET /api/admin/payment-methods/{id}
#[utoipa::path(
    get,
    path = "/api/admin/payment-methods/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da forma de pagamento")),
    responses(
        (status = 200, body = PaymentMethod),
        (status = 404, description = "Forma de pagamento não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let method = app_state
        .finance_service
        .get_payment_method(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(method))
}

// GET /api/admin/payment-methods/my-payment-methods?activeOnly=true
#[utoipa::path(
    get,
    path = "/api/admin/payment-methods/my-payment-methods",
    tag = "Finance",
    params(PaymentMethodFilter),
    responses((status = 200, body = Vec<PaymentMethod>)),
    security(("api_jwt" = []))
)]
pub async fn my_payment_methods(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(filter): Query<PaymentMethodFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let methods = app_state
        .finance_service
        .list_payment_methods(&session, filter.active_only)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(methods))
}

// PATCH /api/admin/payment-methods/{id}/activate
#[utoipa::path(
    patch,
    path = "/api/admin/payment-methods/{id}/activate",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da forma de pagamento")),
    responses(
        (status = 200, body = PaymentMethod),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Forma de pagamento não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn activate_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let method = app_state
        .finance_service
        .set_payment_method_active(&session, id, true)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(method))
}

// PATCH /api/admin/payment-methods/{id}/deactivate
#[utoipa::path(
    patch,
    path = "/api/admin/payment-methods/{id}/deactivate",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da forma de pagamento")),
    responses(
        (status = 200, body = PaymentMethod),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Forma de pagamento não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_payment_method(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let method = app_state
        .finance_service
        .set_payment_method_active(&session, id, false)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(method))
}

// =============================================================================
//  2. CONTAS BANCÁRIAS
// =============================================================================

// POST /api/admin/bank-accounts
#[utoipa::path(
    post,
    path = "/api/admin/bank-accounts",
    tag = "Finance",
    request_body = BankAccountPayload,
    responses(
        (status = 201, description = "Conta cadastrada", body = BankAccount),
        (status = 400, description = "Dados inválidos ou conta duplicada"),
        (status = 403, description = "Apenas dono ou gerente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_bank_account(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Json(payload): Json<BankAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .finance_service
        .create_bank_account(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(account)))
}

// GET /api/admin/bank-accounts/{id}
#[utoipa::path(
    get,
    path = "/api/admin/bank-accounts/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, body = BankAccount),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_bank_account(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .finance_service
        .get_bank_account(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}

// GET /api/admin/bank-accounts/my-bank-accounts
#[utoipa::path(
    get,
    path = "/api/admin/bank-accounts/my-bank-accounts",
    tag = "Finance",
    responses((status = 200, body = Vec<BankAccount>)),
    security(("api_jwt" = []))
)]
pub async fn my_bank_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .finance_service
        .list_bank_accounts(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(accounts))
}

// PATCH /api/admin/bank-accounts/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/bank-accounts/{id}",
    tag = "Finance",
    request_body = BankAccountPayload,
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, body = BankAccount),
        (status = 400, description = "Dados inválidos ou conta de outra oficina"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_bank_account(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BankAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .finance_service
        .update_bank_account(&session, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}

// DELETE /api/admin/bank-accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/bank-accounts/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 204, description = "Conta desativada"),
        (status = 403, description = "Apenas dono ou gerente"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_bank_account(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    _: RequireRole<GarageManagement>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete_bank_account(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  3. FOTOGRAFIAS DIÁRIAS
// =============================================================================

// POST /api/admin/daily-snapshots/generate?date=2025-01-31
#[utoipa::path(
    post,
    path = "/api/admin/daily-snapshots/generate",
    tag = "Finance",
    params(SnapshotDateQuery),
    responses((status = 200, description = "Fotografia gerada ou recalculada", body = DailySnapshot)),
    security(("api_jwt" = []))
)]
pub async fn generate_snapshot(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(query): Query<SnapshotDateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = app_state
        .snapshot_service
        .generate(&session, query.date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(snapshot))
}

// GET /api/admin/daily-snapshots/{date}
#[utoipa::path(
    get,
    path = "/api/admin/daily-snapshots/{date}",
    tag = "Finance",
    params(("date" = String, Path, format = Date, description = "Dia (AAAA-MM-DD)")),
    responses(
        (status = 200, body = DailySnapshot),
        (status = 404, description = "Nenhuma fotografia para o dia")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_snapshot(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = app_state
        .snapshot_service
        .get(&session, date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(snapshot))
}

// GET /api/admin/daily-snapshots/range?from=&to=
#[utoipa::path(
    get,
    path = "/api/admin/daily-snapshots/range",
    tag = "Finance",
    params(DateRangeQuery),
    responses(
        (status = 200, body = Vec<DailySnapshot>),
        (status = 400, description = "Intervalo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn snapshot_range(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshots = app_state
        .snapshot_service
        .range(&session, range)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(snapshots))
}

// GET /api/admin/daily-snapshots/summary?from=&to=
#[utoipa::path(
    get,
    path = "/api/admin/daily-snapshots/summary",
    tag = "Finance",
    params(DateRangeQuery),
    responses(
        (status = 200, body = SnapshotSummary),
        (status = 400, description = "Intervalo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn snapshot_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .snapshot_service
        .summary(&session, range)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
