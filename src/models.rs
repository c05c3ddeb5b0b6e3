pub mod auth;
pub mod dashboard;
pub mod notifications;
pub mod packages;
pub mod residents;
pub mod responses;
pub mod tenancy;
