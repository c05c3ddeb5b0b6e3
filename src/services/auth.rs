// src/services/auth.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::{AppError, AppResult},
    db::UserRepository,
    models::auth::{Claims, ExternalIdentity, OAuthCallbackQuery, UpsertUser, User},
};

pub const SESSION_TTL_DAYS: i64 = 365;

const DEV_CODE_PREFIX: &str = "dev_mock_code_";

/// Troca do código de autorização OAuth pela identidade do usuário.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityExchange: Send + Sync {
    async fn exchange(&self, code: &str, state: &str) -> AppResult<ExternalIdentity>;
}

/// Login local: qualquer código aceito vira um usuário novo de desenvolvimento.
pub struct DevIdentityExchange;

#[async_trait]
impl IdentityExchange for DevIdentityExchange {
    async fn exchange(&self, _code: &str, _state: &str) -> AppResult<ExternalIdentity> {
        Ok(ExternalIdentity {
            open_id: format!("dev_user_{}", Utc::now().timestamp_millis()),
            name: Some("Dev User".to_string()),
            email: Some("dev@localhost".to_string()),
            login_method: Some("dev".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    owner_open_id: Option<String>,
    identity: Option<Arc<dyn IdentityExchange>>,
    dev_login: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_secret: String,
        owner_open_id: Option<String>,
        identity: Option<Arc<dyn IdentityExchange>>,
        dev_login: bool,
    ) -> Self {
        Self {
            users,
            jwt_secret,
            owner_open_id,
            identity,
            dev_login,
        }
    }

    /// Callback OAuth: troca o código, faz o upsert do usuário e emite a sessão.
    pub async fn sign_in_with_code(&self, query: &OAuthCallbackQuery) -> AppResult<(User, String)> {
        let code = query.code.as_deref().unwrap_or_default();

        if self.dev_login && (query.dev.as_deref() == Some("true") || code.starts_with(DEV_CODE_PREFIX)) {
            let identity = DevIdentityExchange.exchange(code, "").await?;
            return self.sign_in(identity).await;
        }

        let (Some(code), Some(state)) = (query.code.as_deref(), query.state.as_deref()) else {
            return Err(AppError::BadRequest("code and state are required".into()));
        };

        let exchange = self
            .identity
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("Identity provider is not configured.".into()))?;

        let identity = exchange.exchange(code, state).await?;
        if identity.open_id.trim().is_empty() {
            return Err(AppError::BadRequest("openId missing from user info".into()));
        }

        self.sign_in(identity).await
    }

    pub async fn sign_in(&self, identity: ExternalIdentity) -> AppResult<(User, String)> {
        let force_admin = self.owner_open_id.as_deref() == Some(identity.open_id.as_str());

        let user = self
            .users
            .upsert(&UpsertUser {
                open_id: identity.open_id,
                name: identity.name,
                email: identity.email,
                login_method: identity.login_method,
                force_admin,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "🔑 Sessão iniciada");

        let token = self.create_token(&user)?;
        Ok((user, token))
    }

    pub async fn validate_token(&self, token: &str) -> AppResult<User> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid session.".into()))?;

        self.users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session.".into()))
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        let claims = Claims {
            sub: user.id,
            name: user.name.clone().unwrap_or_default(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
