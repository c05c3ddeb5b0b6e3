// src/models/notifications.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewPackage,
    PackageCollected,
    System,
}

// Notificação in-app para o morador
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub recipient_user_id: Uuid,
    pub resident_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub kind: NotificationKind,

    #[schema(example = "New package received")]
    pub title: String,

    #[schema(example = "You have a new parcel waiting for pickup at unit 101.")]
    pub body: String,

    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub tenant_id: Uuid,
    pub recipient_user_id: Uuid,
    pub resident_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}
