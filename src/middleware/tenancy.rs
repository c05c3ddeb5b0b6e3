// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    common::error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::auth::{TenantAssignment, User},
};

/// Usuário autenticado já resolvido para o seu condomínio.
///
/// Só é construído por [`tenant_membership`]; o `tenant_id` que chega aos
/// serviços vem sempre daqui e nunca do cliente.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant_id: Uuid,
    user: User,
}

impl TenantContext {
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

pub fn tenant_membership(user: User) -> AppResult<TenantContext> {
    match user.tenant() {
        TenantAssignment::AssignedTo(tenant_id) => Ok(TenantContext { tenant_id, user }),
        TenantAssignment::Unassigned => Err(AppError::Forbidden(
            "User is not linked to any condominium.".into(),
        )),
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        tenant_membership(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;

    fn user(role: Role, tenant_id: Option<Uuid>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            open_id: format!("test|{}", Uuid::new_v4()),
            name: Some("Test".into()),
            email: None,
            login_method: None,
            role,
            tenant_id,
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        }
    }

    #[test]
    fn unassigned_user_is_forbidden() {
        let err = tenant_membership(user(Role::Manager, None)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn assigned_user_carries_its_tenant() {
        let tenant_id = Uuid::new_v4();
        let ctx = tenant_membership(user(Role::Resident, Some(tenant_id))).unwrap();
        assert_eq!(ctx.tenant_id(), tenant_id);
        assert_eq!(ctx.user().role, Role::Resident);
    }
}
