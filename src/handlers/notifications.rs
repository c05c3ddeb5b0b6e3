// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::{notifications::Notification, responses::SuccessResponse},
};

// GET /api/notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, description = "Notificações do usuário, mais recentes primeiro", body = Vec<Notification>)),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(app_state.notification_service.list(&ctx).await?))
}

// GET /api/notifications/unread
#[utoipa::path(
    get,
    path = "/api/notifications/unread",
    tag = "Notifications",
    responses((status = 200, description = "Notificações não lidas", body = Vec<Notification>)),
    security(("api_jwt" = []))
)]
pub async fn list_unread_notifications(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(app_state.notification_service.list_unread(&ctx).await?))
}

// POST /api/notifications/{id}/read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Marcada como lida", body = SuccessResponse),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    app_state.notification_service.mark_read(&ctx, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

// POST /api/notifications/read-all
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    responses((status = 200, description = "Todas marcadas como lidas", body = SuccessResponse)),
    security(("api_jwt" = []))
)]
pub async fn mark_all_notifications_read(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<SuccessResponse>, AppError> {
    app_state.notification_service.mark_all_read(&ctx).await?;
    Ok(Json(SuccessResponse::ok()))
}
