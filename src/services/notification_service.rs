// src/services/notification_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::{AppError, AppResult},
    db::NotificationRepository,
    middleware::tenancy::TenantContext,
    models::{
        notifications::{NewNotification, Notification, NotificationKind},
        packages::Package,
    },
};

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<Notification>> {
        self.repo.list_for_user(ctx.user().id, ctx.tenant_id()).await
    }

    pub async fn list_unread(&self, ctx: &TenantContext) -> AppResult<Vec<Notification>> {
        self.repo.list_unread(ctx.user().id, ctx.tenant_id()).await
    }

    /// Idempotente. Notificação de outro usuário (ou condomínio) é "não encontrada".
    pub async fn mark_read(&self, ctx: &TenantContext, id: Uuid) -> AppResult<()> {
        let marked = self.repo.mark_read(id, ctx.user().id, ctx.tenant_id()).await?;
        if !marked {
            return Err(AppError::NotFound("Notification not found.".into()));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, ctx: &TenantContext) -> AppResult<u64> {
        let count = self.repo.mark_all_read(ctx.user().id, ctx.tenant_id()).await?;
        tracing::debug!(user_id = %ctx.user().id, count, "Notificações marcadas como lidas");
        Ok(count)
    }

    pub async fn notify_new_package(&self, recipient_user_id: Uuid, package: &Package) {
        self.dispatch(NewNotification {
            tenant_id: package.tenant_id,
            recipient_user_id,
            resident_id: Some(package.resident_id),
            package_id: Some(package.id),
            kind: NotificationKind::NewPackage,
            title: "New package received".to_string(),
            body: format!(
                "You have a new {} waiting for pickup at unit {}.",
                package.kind.label(),
                package.unit_label
            ),
        })
        .await;
    }

    pub async fn notify_collected(&self, recipient_user_id: Uuid, package: &Package, collected_by: &str) {
        self.dispatch(NewNotification {
            tenant_id: package.tenant_id,
            recipient_user_id,
            resident_id: Some(package.resident_id),
            package_id: Some(package.id),
            kind: NotificationKind::PackageCollected,
            title: "Package collected".to_string(),
            body: format!("Your {} was collected by {}.", package.kind.label(), collected_by),
        })
        .await;
    }

    // Melhor esforço: a operação principal já foi gravada, a falha só é logada.
    async fn dispatch(&self, input: NewNotification) {
        if let Err(e) = self.repo.create(&input).await {
            tracing::warn!(
                tenant_id = %input.tenant_id,
                package_id = ?input.package_id,
                kind = ?input.kind,
                "⚠️ Falha ao criar notificação: {}",
                e
            );
        }
    }
}
