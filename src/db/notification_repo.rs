// src/db/notification_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppResult,
    models::notifications::{NewNotification, Notification},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, input: &NewNotification) -> AppResult<Notification>;

    async fn list_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>>;

    async fn list_unread(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Retorna `false` se a notificação não pertence ao usuário neste condomínio.
    async fn mark_read(&self, id: Uuid, user_id: Uuid, tenant_id: Uuid) -> AppResult<bool>;

    /// Retorna quantas notificações foram marcadas.
    async fn mark_all_read(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, input: &NewNotification) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                tenant_id, recipient_user_id, resident_id, package_id, kind, title, body
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(input.tenant_id)
        .bind(input.recipient_user_id)
        .bind(input.resident_id)
        .bind(input.package_id)
        .bind(input.kind)
        .bind(&input.title)
        .bind(&input.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE recipient_user_id = $1 AND tenant_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn list_unread(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE recipient_user_id = $1 AND tenant_id = $2 AND read = false
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid, tenant_id: Uuid) -> AppResult<bool> {
        // COALESCE mantém a primeira leitura: marcar de novo não é erro
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = true, read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND recipient_user_id = $2 AND tenant_id = $3
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = true, read_at = NOW()
            WHERE recipient_user_id = $1 AND tenant_id = $2 AND read = false
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
