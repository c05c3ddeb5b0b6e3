pub mod auth;
pub mod dashboard_service;
pub mod notification_service;
pub mod package_service;
pub mod resident_service;
pub mod storage;
pub mod tenancy_service;
