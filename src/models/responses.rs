// src/models/responses.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Resposta das mutações que criam um registro
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
