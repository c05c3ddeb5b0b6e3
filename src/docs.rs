// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::oauth_callback,
        handlers::auth::get_me,
        handlers::auth::logout,

        // --- Residents ---
        handlers::residents::list_residents,
        handlers::residents::create_resident,
        handlers::residents::get_my_resident,

        // --- Packages ---
        handlers::packages::register_package,
        handlers::packages::list_packages_by_period,
        handlers::packages::list_pending_packages,
        handlers::packages::list_packages_by_resident,
        handlers::packages::get_package,
        handlers::packages::register_pickup,
        handlers::packages::get_pickup,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::list_unread_notifications,
        handlers::notifications::mark_notification_read,
        handlers::notifications::mark_all_notifications_read,

        // --- Tenancy ---
        handlers::tenancy::get_tenant,
        handlers::tenancy::list_tenant_users,

        // --- Reports ---
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,

            // --- Residents ---
            models::residents::Resident,
            models::residents::CreateResidentPayload,

            // --- Packages ---
            models::packages::PackageKind,
            models::packages::PackageStatus,
            models::packages::Package,
            models::packages::Pickup,
            models::packages::RegisterPackagePayload,
            models::packages::RegisterPickupPayload,

            // --- Notifications ---
            models::notifications::NotificationKind,
            models::notifications::Notification,

            // --- Tenancy ---
            models::tenancy::Tenant,

            // --- Reports ---
            models::dashboard::DashboardReport,

            // --- Respostas ---
            models::responses::CreatedResponse,
            models::responses::SuccessResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Login OAuth e sessão"),
        (name = "Residents", description = "Moradores do condomínio"),
        (name = "Packages", description = "Registro e retirada de encomendas"),
        (name = "Notifications", description = "Notificações in-app"),
        (name = "Tenancy", description = "Condomínio e seus usuários"),
        (name = "Reports", description = "Painel do síndico")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
