// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Porter,
    #[default]
    Resident,
    Manager,
    Admin,
}

/// Vínculo do usuário com um condomínio. Substitui o `tenant_id` nulo nas
/// fronteiras do domínio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAssignment {
    Unassigned,
    AssignedTo(Uuid),
}

impl From<Option<Uuid>> for TenantAssignment {
    fn from(value: Option<Uuid>) -> Self {
        match value {
            Some(tenant_id) => TenantAssignment::AssignedTo(tenant_id),
            None => TenantAssignment::Unassigned,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    // Identificador do provedor OAuth
    #[schema(example = "oauth|2f9c7a")]
    pub open_id: String,

    #[schema(example = "Carlos Souza")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Role,

    #[schema(ignore)]
    pub tenant_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

impl User {
    pub fn tenant(&self) -> TenantAssignment {
        self.tenant_id.into()
    }

    /// Nome usado nos campos "snapshot" (quem registrou, quem entregou).
    pub fn display_name(&self) -> Option<String> {
        self.name.clone().filter(|name| !name.trim().is_empty())
    }
}

/// O que a troca de identidade (OAuth) devolve.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}

/// Entrada do upsert de usuário (chave: `open_id`).
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    // Dono da instalação: sempre admin
    pub force_admin: bool,
}

// Estrutura de dados ("claims") dentro do token de sessão
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // Subject (ID do usuário)
    pub name: String,
    pub exp: usize,  // Expiration time (quando o token expira)
    pub iat: usize,  // Issued At (quando o token foi criado)
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub dev: Option<String>,
}
