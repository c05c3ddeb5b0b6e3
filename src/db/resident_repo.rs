// src/db/resident_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppResult,
    models::residents::{NewResident, Resident},
};

// Toda consulta recebe o tenant_id: não existe forma "global" de ler moradores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Resident>>;

    /// `None` tanto para id inexistente quanto para id de outro condomínio.
    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>>;

    async fn find_by_linked_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>>;

    async fn create(&self, tenant_id: Uuid, input: &NewResident) -> AppResult<Resident>;
}

#[derive(Clone)]
pub struct PgResidentRepository {
    pool: PgPool,
}

impl PgResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResidentRepository for PgResidentRepository {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Resident>> {
        let residents = sqlx::query_as::<_, Resident>(
            r#"
            SELECT * FROM residents
            WHERE tenant_id = $1
            ORDER BY unit_label ASC, name ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(residents)
    }

    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>> {
        let resident = sqlx::query_as::<_, Resident>(
            "SELECT * FROM residents WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resident)
    }

    async fn find_by_linked_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>> {
        let resident = sqlx::query_as::<_, Resident>(
            r#"
            SELECT * FROM residents
            WHERE linked_user_id = $1 AND tenant_id = $2
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resident)
    }

    async fn create(&self, tenant_id: Uuid, input: &NewResident) -> AppResult<Resident> {
        let resident = sqlx::query_as::<_, Resident>(
            r#"
            INSERT INTO residents (tenant_id, name, unit_label, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.unit_label)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(resident)
    }
}
