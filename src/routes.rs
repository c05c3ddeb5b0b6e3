// src/routes.rs

use std::path::Path;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo. `uploads` é a pasta servida em `/uploads`.
pub fn build_router(app_state: AppState, uploads: Option<&Path>) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/oauth/callback", get(handlers::auth::oauth_callback))
        .route("/auth/logout", post(handlers::auth::logout));

    // Tudo abaixo passa pelo auth_guard; condomínio e papel são checados
    // pelos extratores de cada handler
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route(
            "/residents",
            get(handlers::residents::list_residents).post(handlers::residents::create_resident),
        )
        .route("/residents/me", get(handlers::residents::get_my_resident))
        .route(
            "/packages",
            get(handlers::packages::list_packages_by_period).post(handlers::packages::register_package),
        )
        .route("/packages/pending", get(handlers::packages::list_pending_packages))
        .route(
            "/packages/by-resident/{resident_id}",
            get(handlers::packages::list_packages_by_resident),
        )
        .route("/packages/{id}", get(handlers::packages::get_package))
        .route(
            "/packages/{id}/pickup",
            get(handlers::packages::get_pickup).post(handlers::packages::register_pickup),
        )
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route(
            "/notifications/unread",
            get(handlers::notifications::list_unread_notifications),
        )
        .route(
            "/notifications/read-all",
            post(handlers::notifications::mark_all_notifications_read),
        )
        .route(
            "/notifications/{id}/read",
            post(handlers::notifications::mark_notification_read),
        )
        .route("/tenant", get(handlers::tenancy::get_tenant))
        .route("/tenant/users", get(handlers::tenancy::list_tenant_users))
        .route("/reports/dashboard", get(handlers::dashboard::get_dashboard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let mut app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", public_routes.merge(protected_routes));

    if let Some(dir) = uploads {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(app_state)
}
