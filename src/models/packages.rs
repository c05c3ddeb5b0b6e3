// src/models/packages.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "package_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Letter,
    Parcel,
    Delivery,
}

impl PackageKind {
    pub fn label(self) -> &'static str {
        match self {
            PackageKind::Letter => "letter",
            PackageKind::Parcel => "parcel",
            PackageKind::Delivery => "delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "package_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Pending,
    Collected,
}

// ---
// Encomenda registrada pela portaria
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub resident_id: Uuid,

    // Cópia do apartamento no momento do registro
    #[schema(example = "101")]
    pub unit_label: String,

    pub kind: PackageKind,

    #[schema(example = "/uploads/packages/4f1c.../1718000000000-k3j9a2b.jpg")]
    pub photo_url: Option<String>,
    pub photo_storage_key: Option<String>,

    #[schema(example = "Caixa grande, frágil")]
    pub notes: Option<String>,

    pub status: PackageStatus,

    pub registered_by_user_id: Uuid,
    // Nome do porteiro (snapshot)
    pub registered_by_name: Option<String>,

    pub registered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPackage {
    pub tenant_id: Uuid,
    pub resident_id: Uuid,
    pub unit_label: String,
    pub kind: PackageKind,
    pub photo_url: Option<String>,
    pub photo_storage_key: Option<String>,
    pub notes: Option<String>,
    pub registered_by_user_id: Uuid,
    pub registered_by_name: Option<String>,
}

// O Payload para registrar uma encomenda na portaria
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPackagePayload {
    pub resident_id: Uuid,

    #[validate(length(min = 1, max = 20, message = "Unit must have between 1 and 20 characters."))]
    #[schema(example = "101")]
    pub unit: String,

    pub kind: PackageKind,

    pub notes: Option<String>,

    // A foto só é enviada quando os dois campos estão presentes
    pub photo_base64: Option<String>,
    #[schema(example = "image/jpeg")]
    pub photo_mime_type: Option<String>,
}

/// Foto já separada do payload, pronta para o upload.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub base64: String,
    pub mime_type: String,
}

impl RegisterPackagePayload {
    pub fn photo(&self) -> Option<PhotoUpload> {
        match (&self.photo_base64, &self.photo_mime_type) {
            (Some(base64), Some(mime_type)) => Some(PhotoUpload {
                base64: base64.clone(),
                mime_type: mime_type.clone(),
            }),
            _ => None,
        }
    }
}

// ---
// Retirada: fecha o ciclo de vida da encomenda (no máximo uma por encomenda)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pickup {
    pub id: Uuid,
    pub package_id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Jane Almeida")]
    pub collected_by_name: String,

    // Assinatura digital (base64) ou código de confirmação
    pub signature_or_code: Option<String>,
    pub notes: Option<String>,

    pub recorded_by_user_id: Option<Uuid>,
    pub recorded_by_name: Option<String>,

    pub collected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPickup {
    pub tenant_id: Uuid,
    pub package_id: Uuid,
    pub collected_by_name: String,
    pub signature_or_code: Option<String>,
    pub notes: Option<String>,
    pub recorded_by_user_id: Option<Uuid>,
    pub recorded_by_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPickupPayload {
    #[validate(length(min = 1, max = 255, message = "Collector name must have between 1 and 255 characters."))]
    #[schema(example = "Jane Almeida")]
    pub collected_by_name: String,
    pub signature_or_code: Option<String>,
    pub notes: Option<String>,
}

// Filtro de período (`?start=...&end=...`, RFC 3339)
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
