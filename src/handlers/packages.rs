// src/handlers/packages.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PorterTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{
        packages::{Package, PeriodQuery, Pickup, RegisterPackagePayload, RegisterPickupPayload},
        responses::CreatedResponse,
    },
};

// POST /api/packages
#[utoipa::path(
    post,
    path = "/api/packages",
    tag = "Packages",
    request_body = RegisterPackagePayload,
    responses(
        (status = 201, description = "Encomenda registrada", body = CreatedResponse),
        (status = 400, description = "Dados ou foto inválidos"),
        (status = 403, description = "Restrito à portaria"),
        (status = 404, description = "Morador não encontrado"),
        (status = 503, description = "Storage ou banco indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_package(
    State(app_state): State<AppState>,
    guard: RequireRole<PorterTier>,
    Json(payload): Json<RegisterPackagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let package = app_state.package_service.register(&guard, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: package.id })))
}

// GET /api/packages?start=...&end=...
#[utoipa::path(
    get,
    path = "/api/packages",
    tag = "Packages",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Encomendas registradas no período", body = Vec<Package>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_packages_by_period(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<Vec<Package>>, AppError> {
    let packages = app_state
        .package_service
        .list_by_period(&ctx, period.start, period.end)
        .await?;
    Ok(Json(packages))
}

// GET /api/packages/pending
#[utoipa::path(
    get,
    path = "/api/packages/pending",
    tag = "Packages",
    responses((status = 200, description = "Encomendas aguardando retirada", body = Vec<Package>)),
    security(("api_jwt" = []))
)]
pub async fn list_pending_packages(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<Package>>, AppError> {
    let packages = app_state.package_service.list_pending(&ctx).await?;
    Ok(Json(packages))
}

// GET /api/packages/by-resident/{resident_id}
#[utoipa::path(
    get,
    path = "/api/packages/by-resident/{resident_id}",
    tag = "Packages",
    params(("resident_id" = Uuid, Path, description = "ID do morador")),
    responses(
        (status = 200, description = "Encomendas do morador", body = Vec<Package>),
        (status = 403, description = "Morador consultando outro morador")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_packages_by_resident(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<Vec<Package>>, AppError> {
    let packages = app_state
        .package_service
        .list_by_resident(&ctx, resident_id)
        .await?;
    Ok(Json(packages))
}

// GET /api/packages/{id}
#[utoipa::path(
    get,
    path = "/api/packages/{id}",
    tag = "Packages",
    params(("id" = Uuid, Path, description = "ID da encomenda")),
    responses(
        (status = 200, description = "Encomenda", body = Package),
        (status = 404, description = "Encomenda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_package(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, AppError> {
    let package = app_state.package_service.get(&ctx, id).await?;
    Ok(Json(package))
}

// POST /api/packages/{id}/pickup
#[utoipa::path(
    post,
    path = "/api/packages/{id}/pickup",
    tag = "Packages",
    params(("id" = Uuid, Path, description = "ID da encomenda")),
    request_body = RegisterPickupPayload,
    responses(
        (status = 201, description = "Retirada registrada", body = CreatedResponse),
        (status = 400, description = "Encomenda já retirada ou nome ausente"),
        (status = 404, description = "Encomenda não encontrada"),
        (status = 409, description = "Retirada concorrente já registrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_pickup(
    State(app_state): State<AppState>,
    guard: RequireRole<PorterTier>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterPickupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pickup = app_state
        .package_service
        .register_pickup(&guard, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: pickup.id })))
}

// GET /api/packages/{id}/pickup
#[utoipa::path(
    get,
    path = "/api/packages/{id}/pickup",
    tag = "Packages",
    params(("id" = Uuid, Path, description = "ID da encomenda")),
    responses(
        (status = 200, description = "Retirada da encomenda", body = Pickup),
        (status = 404, description = "Sem retirada registrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pickup(
    State(app_state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Pickup>, AppError> {
    let pickup = app_state.package_service.get_pickup(&ctx, id).await?;
    Ok(Json(pickup))
}
