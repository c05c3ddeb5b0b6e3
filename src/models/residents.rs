// src/models/residents.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Morador de um apartamento. Pode existir sem conta de usuário
// (cadastrado pela portaria antes do primeiro login).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Jane Almeida")]
    pub name: String,

    #[schema(example = "101")]
    pub unit_label: String,

    pub phone: Option<String>,
    pub email: Option<String>,

    // Quando presente, é o destinatário das notificações deste morador
    pub linked_user_id: Option<Uuid>,

    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResident {
    pub name: String,
    pub unit_label: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// O Payload para cadastrar um morador
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResidentPayload {
    #[validate(length(min = 1, max = 255, message = "Name must have between 1 and 255 characters."))]
    #[schema(example = "Jane Almeida")]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Unit must have between 1 and 20 characters."))]
    #[schema(example = "101")]
    pub unit: String,

    #[validate(length(max = 20, message = "Phone must have at most 20 characters."))]
    #[schema(example = "(11) 98888-7777")]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid e-mail."), length(max = 320))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
}

impl From<CreateResidentPayload> for NewResident {
    fn from(payload: CreateResidentPayload) -> Self {
        Self {
            name: payload.name,
            unit_label: payload.unit,
            phone: payload.phone,
            email: payload.email,
        }
    }
}
