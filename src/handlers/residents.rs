// src/handlers/residents.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{ManagerTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{
        residents::{CreateResidentPayload, Resident},
        responses::CreatedResponse,
    },
};

// GET /api/residents
#[utoipa::path(
    get,
    path = "/api/residents",
    tag = "Residents",
    responses(
        (status = 200, description = "Moradores do condomínio, por apartamento", body = Vec<Resident>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Usuário sem condomínio")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_residents(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<Resident>>, AppError> {
    let residents = app_state.resident_service.list(&ctx).await?;
    Ok(Json(residents))
}

// POST /api/residents
#[utoipa::path(
    post,
    path = "/api/residents",
    tag = "Residents",
    request_body = CreateResidentPayload,
    responses(
        (status = 201, description = "Morador cadastrado", body = CreatedResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Restrito a síndicos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resident(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
    Json(payload): Json<CreateResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resident = app_state
        .resident_service
        .create(&guard, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: resident.id })))
}

// GET /api/residents/me
#[utoipa::path(
    get,
    path = "/api/residents/me",
    tag = "Residents",
    responses(
        (status = 200, description = "Cadastro do morador logado (ou null)", body = Resident),
        (status = 403, description = "Usuário sem condomínio")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_resident(
    State(app_state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Option<Resident>>, AppError> {
    let resident = app_state.resident_service.get_by_calling_user(&ctx).await?;
    Ok(Json(resident))
}
