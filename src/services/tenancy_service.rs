// src/services/tenancy_service.rs

use std::sync::Arc;

use crate::{
    common::error::{AppError, AppResult},
    db::{TenantRepository, UserRepository},
    middleware::{
        rbac::{ManagerTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{auth::User, tenancy::Tenant},
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: Arc<dyn TenantRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl TenantService {
    pub fn new(tenant_repo: Arc<dyn TenantRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { tenant_repo, user_repo }
    }

    /// O condomínio do usuário logado.
    pub async fn current(&self, ctx: &TenantContext) -> AppResult<Tenant> {
        self.tenant_repo
            .find_by_id(ctx.tenant_id())
            .await?
            .ok_or_else(|| AppError::NotFound("Condominium not found.".into()))
    }

    pub async fn list_users(&self, guard: &RequireRole<ManagerTier>) -> AppResult<Vec<User>> {
        self.user_repo.list_by_tenant(guard.context().tenant_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStore,
        middleware::{rbac::require_role, tenancy::tenant_membership},
        models::auth::Role,
    };

    #[tokio::test]
    async fn users_are_listed_only_for_the_managers_tenant() {
        let store = MemoryStore::new();
        let a = store.insert_tenant("A").await;
        let b = store.insert_tenant("B").await;
        let manager = store.insert_user("Marta", Role::Manager, Some(a.id)).await;
        store.insert_user("Paulo", Role::Porter, Some(a.id)).await;
        store.insert_user("Bruno", Role::Porter, Some(b.id)).await;
        store.insert_user("Sem condomínio", Role::Resident, None).await;

        let service = TenantService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        let guard = require_role::<ManagerTier>(tenant_membership(manager).unwrap()).unwrap();

        let users = service.list_users(&guard).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.tenant_id == Some(a.id)));

        let tenant = service.current(guard.context()).await.unwrap();
        assert_eq!(tenant.name, "A");
    }
}
