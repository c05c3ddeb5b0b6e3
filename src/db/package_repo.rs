// src/db/package_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppResult,
    models::{
        dashboard::PeriodCounts,
        packages::{NewPackage, Package},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, input: &NewPackage) -> AppResult<Package>;

    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Package>>;

    async fn list_pending(&self, tenant_id: Uuid) -> AppResult<Vec<Package>>;

    async fn list_by_resident(&self, resident_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Package>>;

    /// Encomendas registradas entre `start` e `end` (inclusive).
    async fn list_by_period(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Package>>;

    async fn count_pending(&self, tenant_id: Uuid) -> AppResult<i64>;

    async fn period_counts(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<PeriodCounts>;
}

#[derive(Clone)]
pub struct PgPackageRepository {
    pool: PgPool,
}

impl PgPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PackageRepository for PgPackageRepository {
    async fn create(&self, input: &NewPackage) -> AppResult<Package> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages (
                tenant_id, resident_id, unit_label, kind,
                photo_url, photo_storage_key, notes, status,
                registered_by_user_id, registered_by_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9)
            RETURNING *
            "#,
        )
        .bind(input.tenant_id)
        .bind(input.resident_id)
        .bind(&input.unit_label)
        .bind(input.kind)
        .bind(&input.photo_url)
        .bind(&input.photo_storage_key)
        .bind(&input.notes)
        .bind(input.registered_by_user_id)
        .bind(&input.registered_by_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(package)
    }

    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    async fn list_pending(&self, tenant_id: Uuid) -> AppResult<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            r#"
            SELECT * FROM packages
            WHERE tenant_id = $1 AND status = 'pending'
            ORDER BY registered_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    async fn list_by_resident(&self, resident_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            r#"
            SELECT * FROM packages
            WHERE resident_id = $1 AND tenant_id = $2
            ORDER BY registered_at DESC
            "#,
        )
        .bind(resident_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    async fn list_by_period(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            r#"
            SELECT * FROM packages
            WHERE tenant_id = $1
              AND registered_at >= $2
              AND registered_at <= $3
            ORDER BY registered_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    async fn count_pending(&self, tenant_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM packages WHERE tenant_id = $1 AND status = 'pending'",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn period_counts(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<PeriodCounts> {
        // Uma única passada: total do período + quantas já foram retiradas
        let (total, collected): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'collected')
            FROM packages
            WHERE tenant_id = $1
              AND registered_at >= $2
              AND registered_at <= $3
            "#,
        )
        .bind(tenant_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(PeriodCounts { total, collected })
    }
}
