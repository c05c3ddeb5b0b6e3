// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Tenant (O "Condomínio")
// ---
// Raiz do isolamento: todo morador, encomenda e notificação pertence a um.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    #[schema(example = "Residencial Jardim das Flores")]
    pub name: String,

    #[schema(example = "Rua das Acácias, 120")]
    pub address: Option<String>,

    #[schema(example = "(11) 3333-4444")]
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
