// Cadeia de guardas: autenticação -> condomínio -> papel
pub mod auth;
pub mod rbac;
pub mod tenancy;
