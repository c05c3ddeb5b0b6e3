// src/services/resident_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppResult,
    db::ResidentRepository,
    middleware::{
        rbac::{ManagerTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{
        auth::Role,
        residents::{NewResident, Resident},
    },
};

#[derive(Clone)]
pub struct ResidentService {
    repo: Arc<dyn ResidentRepository>,
}

impl ResidentService {
    pub fn new(repo: Arc<dyn ResidentRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<Resident>> {
        self.repo.list_by_tenant(ctx.tenant_id()).await
    }

    pub async fn create(&self, guard: &RequireRole<ManagerTier>, input: NewResident) -> AppResult<Resident> {
        let tenant_id = guard.context().tenant_id();
        let resident = self.repo.create(tenant_id, &input).await?;

        tracing::info!(tenant_id = %tenant_id, resident_id = %resident.id, "Morador cadastrado");
        Ok(resident)
    }

    /// Cadastro de morador vinculado ao usuário logado. `None` para quem não é morador.
    pub async fn get_by_calling_user(&self, ctx: &TenantContext) -> AppResult<Option<Resident>> {
        if ctx.user().role != Role::Resident {
            return Ok(None);
        }
        self.repo.find_by_linked_user(ctx.user().id, ctx.tenant_id()).await
    }
}
