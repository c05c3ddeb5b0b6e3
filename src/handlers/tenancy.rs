// src/handlers/tenancy.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{ManagerTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{auth::User, tenancy::Tenant},
};

// GET /api/tenant
#[utoipa::path(
    get,
    path = "/api/tenant",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Condomínio do usuário", body = Tenant),
        (status = 403, description = "Usuário sem condomínio")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tenant(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Tenant>, AppError> {
    Ok(Json(app_state.tenant_service.current(&ctx).await?))
}

// GET /api/tenant/users
#[utoipa::path(
    get,
    path = "/api/tenant/users",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Usuários do condomínio", body = Vec<User>),
        (status = 403, description = "Restrito a síndicos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tenant_users(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(app_state.tenant_service.list_users(&guard).await?))
}
