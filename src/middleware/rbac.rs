// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{AppError, AppResult},
    middleware::tenancy::TenantContext,
    models::auth::Role,
};

/// 1. O Trait que define um nível de acesso
pub trait RoleTier: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn denial() -> &'static str;
}

/// 2. O Extractor (Guardião). Só nasce a partir de um `TenantContext`.
pub struct RequireRole<T> {
    ctx: TenantContext,
    _tier: PhantomData<T>,
}

impl<T> RequireRole<T> {
    pub fn context(&self) -> &TenantContext {
        &self.ctx
    }
}

pub fn require_role<T: RoleTier>(ctx: TenantContext) -> AppResult<RequireRole<T>> {
    if !T::allows(ctx.user().role) {
        return Err(AppError::Forbidden(T::denial().to_string()));
    }

    Ok(RequireRole {
        ctx,
        _tier: PhantomData,
    })
}

// 3. Implementação do FromRequestParts: autenticação -> condomínio -> papel
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleTier,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = TenantContext::from_request_parts(parts, state).await?;
        require_role::<T>(ctx)
    }
}

// ---
// NÍVEIS DE ACESSO (TIPOS)
// ---

pub struct PorterTier;
impl RoleTier for PorterTier {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Porter | Role::Manager | Role::Admin)
    }
    fn denial() -> &'static str {
        "Access restricted to porters."
    }
}

pub struct ManagerTier;
impl RoleTier for ManagerTier {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Manager | Role::Admin)
    }
    fn denial() -> &'static str {
        "Access restricted to managers."
    }
}
