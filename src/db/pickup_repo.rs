// src/db/pickup_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::conflict_on_unique,
        error::{AppError, AppResult},
    },
    models::packages::{NewPickup, Pickup},
};

pub(crate) const PICKUP_CONFLICT: &str = "A pickup was already recorded for this package.";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupRepository: Send + Sync {
    /// Grava a retirada e move a encomenda para `collected` numa única unidade
    /// atômica. Uma segunda retirada (ou a perdedora de uma corrida) falha com
    /// `AppError::Conflict`.
    async fn record(&self, input: &NewPickup) -> AppResult<Pickup>;

    async fn find_by_package(&self, package_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Pickup>>;
}

#[derive(Clone)]
pub struct PgPickupRepository {
    pool: PgPool,
}

impl PgPickupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PickupRepository for PgPickupRepository {
    async fn record(&self, input: &NewPickup) -> AppResult<Pickup> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Insere a retirada. O índice único em package_id segura a corrida:
        //    a segunda transação bloqueia aqui e recebe a violação.
        let pickup = sqlx::query_as::<_, Pickup>(
            r#"
            INSERT INTO pickups (
                package_id, tenant_id, collected_by_name, signature_or_code,
                notes, recorded_by_user_id, recorded_by_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(input.package_id)
        .bind(input.tenant_id)
        .bind(&input.collected_by_name)
        .bind(&input.signature_or_code)
        .bind(&input.notes)
        .bind(input.recorded_by_user_id)
        .bind(&input.recorded_by_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, PICKUP_CONFLICT))?;

        // 3. Transição pending -> collected, com o tenant no mesmo predicado
        let updated = sqlx::query(
            r#"
            UPDATE packages
            SET status = 'collected', updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND status = 'pending'
            "#,
        )
        .bind(input.package_id)
        .bind(input.tenant_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Sai do escopo sem commit: rollback automático da retirada
            return Err(AppError::Conflict(PICKUP_CONFLICT.to_string()));
        }

        // 4. Commit
        tx.commit().await?;

        Ok(pickup)
    }

    async fn find_by_package(&self, package_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Pickup>> {
        let pickup = sqlx::query_as::<_, Pickup>(
            "SELECT * FROM pickups WHERE package_id = $1 AND tenant_id = $2",
        )
        .bind(package_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pickup)
    }
}
