// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppResult,
    models::auth::{Role, UpsertUser, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Cria ou atualiza o usuário a cada login (chave: `open_id`).
    async fn upsert(&self, input: &UpsertUser) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, input: &UpsertUser) -> AppResult<User> {
        let initial_role = if input.force_admin { Role::Admin } else { Role::Resident };

        // Campos ausentes na troca de identidade mantêm o valor anterior.
        // O papel só é tocado quando o usuário é o dono da instalação.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (open_id, name, email, login_method, role, last_signed_in)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (open_id) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, users.name),
                email = COALESCE(EXCLUDED.email, users.email),
                login_method = COALESCE(EXCLUDED.login_method, users.login_method),
                role = CASE WHEN $6 THEN 'admin'::user_role ELSE users.role END,
                last_signed_in = NOW(),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&input.open_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.login_method)
        .bind(initial_role)
        .bind(input.force_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE tenant_id = $1 ORDER BY name ASC NULLS LAST",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
