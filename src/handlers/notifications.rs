// src/handlers/notifications.rs

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
    models::notification::{Notification, NotificationPayload, UnreadCount},
};

// POST /api/admin/notifications
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    tag = "Notifications",
    request_body = NotificationPayload,
    responses(
        (status = 201, description = "Notificação registrada e despachada (status SENT ou FAILED)", body = Notification),
        (status = 400, description = "Dados inválidos ou destinatário de outra oficina")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_notification(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<NotificationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let notification = app_state
        .notification_service
        .create(&session, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(notification)))
}

// GET /api/admin/notifications/my-notifications
#[utoipa::path(
    get,
    path = "/api/admin/notifications/my-notifications",
    tag = "Notifications",
    responses((status = 200, body = Vec<Notification>)),
    security(("api_jwt" = []))
)]
pub async fn my_notifications(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = app_state
        .notification_service
        .my_notifications(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(notifications))
}

// GET /api/admin/notifications/unread-count
#[utoipa::path(
    get,
    path = "/api/admin/notifications/unread-count",
    tag = "Notifications",
    responses((status = 200, body = UnreadCount)),
    security(("api_jwt" = []))
)]
pub async fn unread_count(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let count = app_state
        .notification_service
        .unread_count(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(count))
}

// PATCH /api/admin/notifications/{id}/read
#[utoipa::path(
    patch,
    path = "/api/admin/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, body = Notification),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = app_state
        .notification_service
        .mark_read(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(notification))
}

// PATCH /api/admin/notifications/read-all
#[utoipa::path(
    patch,
    path = "/api/admin/notifications/read-all",
    tag = "Notifications",
    responses((status = 200, body = UnreadCount)),
    security(("api_jwt" = []))
)]
pub async fn mark_all_read(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let count = app_state
        .notification_service
        .mark_all_read(&session)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(count))
}

// DELETE /api/admin/notifications/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/notifications/{id}",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 204, description = "Notificação removida"),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_notification(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .notification_service
        .delete(&session, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
