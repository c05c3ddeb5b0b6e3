// src/config.rs

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{MemoryStore, Repositories},
    services::{
        auth::{AuthService, DevIdentityExchange, IdentityExchange},
        dashboard_service::DashboardService,
        notification_service::NotificationService,
        package_service::PackageService,
        resident_service::ResidentService,
        storage::{LocalDiskStorage, ObjectStorage},
        tenancy_service::TenantService,
    },
};

/// Configuração lida do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub owner_open_id: Option<String>,
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub upload_public_url: String,
    pub app_env: String,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let app_env = var("APP_ENV").unwrap_or_else(|| "production".to_string());
        let development = app_env == "development";

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(value) => parse_flag(&value)
                .with_context(|| format!("COOKIE_SECURE inválido: {}", value))?,
            None => !development,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            jwt_secret,
            owner_open_id: var("OWNER_OPEN_ID"),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            upload_dir: var("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()).into(),
            upload_public_url: var("UPLOAD_PUBLIC_URL").unwrap_or_else(|| "/uploads".to_string()),
            app_env,
            cookie_secure,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parâmetros da sessão e do login.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub owner_open_id: Option<String>,
    pub identity: Option<Arc<dyn IdentityExchange>>,
    pub dev_login: bool,
    pub cookie_secure: bool,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub resident_service: ResidentService,
    pub package_service: PackageService,
    pub notification_service: NotificationService,
    pub tenant_service: TenantService,
    pub dashboard_service: DashboardService,
    pub cookie_secure: bool,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Repositories::postgres(db_pool)
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL ausente: usando armazenamento em memória (dados se perdem ao reiniciar)");
                Repositories::memory(MemoryStore::new())
            }
        };

        let storage: Arc<dyn ObjectStorage> = Arc::new(LocalDiskStorage::new(
            config.upload_dir.clone(),
            config.upload_public_url.clone(),
        ));

        // Sem SDK OAuth configurado, só o login de desenvolvimento funciona
        let identity: Option<Arc<dyn IdentityExchange>> = if config.is_development() {
            tracing::info!("🧪 APP_ENV=development: login de desenvolvimento habilitado");
            Some(Arc::new(DevIdentityExchange))
        } else {
            None
        };

        Ok(Self::from_parts(
            repos,
            storage,
            AuthSettings {
                jwt_secret: config.jwt_secret.clone(),
                owner_open_id: config.owner_open_id.clone(),
                identity,
                dev_login: config.is_development(),
                cookie_secure: config.cookie_secure,
            },
        ))
    }

    /// Monta o gráfico de dependências a partir dos repositórios.
    pub fn from_parts(repos: Repositories, storage: Arc<dyn ObjectStorage>, auth: AuthSettings) -> Self {
        let notification_service = NotificationService::new(repos.notifications.clone());

        Self {
            auth_service: AuthService::new(
                repos.users.clone(),
                auth.jwt_secret,
                auth.owner_open_id,
                auth.identity,
                auth.dev_login,
            ),
            resident_service: ResidentService::new(repos.residents.clone()),
            package_service: PackageService::new(
                repos.packages.clone(),
                repos.pickups.clone(),
                repos.residents.clone(),
                storage,
                notification_service.clone(),
            ),
            notification_service,
            tenant_service: TenantService::new(repos.tenants.clone(), repos.users.clone()),
            dashboard_service: DashboardService::new(repos.packages),
            cookie_secure: auth.cookie_secure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn jwt_secret_is_required() {
        assert!(config(&[]).is_err());
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = config(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.upload_public_url, "/uploads");
        assert!(!config.is_development());
        assert!(config.cookie_secure);
    }

    #[test]
    fn development_relaxes_secure_cookies() {
        let dev = config(&[("JWT_SECRET", "s"), ("APP_ENV", "development")]).unwrap();
        assert!(dev.is_development());
        assert!(!dev.cookie_secure);

        let forced = config(&[("JWT_SECRET", "s"), ("APP_ENV", "development"), ("COOKIE_SECURE", "true")]).unwrap();
        assert!(forced.cookie_secure);

        assert!(config(&[("JWT_SECRET", "s"), ("COOKIE_SECURE", "maybe")]).is_err());
    }
}
