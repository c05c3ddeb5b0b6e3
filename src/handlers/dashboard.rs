// src/handlers/dashboard.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{ManagerTier, RequireRole},
    models::dashboard::DashboardReport,
};

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Pendentes agora e movimento do mês", body = DashboardReport),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a síndicos")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
) -> Result<Json<DashboardReport>, AppError> {
    Ok(Json(app_state.dashboard_service.get_report(&guard).await?))
}
