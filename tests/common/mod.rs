//! Utilitários comuns dos testes de integração

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::AUTHORIZATION},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tower::ServiceExt;
use uuid::Uuid;

use portaria_backend::{
    common::error::AppResult,
    config::{AppState, AuthSettings},
    db::{MemoryStore, Repositories, ResidentRepository},
    middleware::{
        rbac::{ManagerTier, PorterTier, RequireRole, require_role},
        tenancy::{TenantContext, tenant_membership},
    },
    models::{
        auth::{Role, User},
        packages::{Package, PackageKind, RegisterPackagePayload, RegisterPickupPayload},
        residents::{NewResident, Resident},
        tenancy::Tenant,
    },
    routes::build_router,
    services::storage::{ObjectStorage, StoredObject},
};

pub const JWT_SECRET: &str = "integration-secret";

/// Storage em memória que guarda as chaves recebidas.
#[derive(Default)]
pub struct RecordingStorage {
    pub keys: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> AppResult<StoredObject> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("/uploads/{}", key),
        })
    }
}

pub struct TestApp {
    pub store: MemoryStore,
    pub storage: Arc<RecordingStorage>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let storage = Arc::new(RecordingStorage::default());
        let state = AppState::from_parts(
            Repositories::memory(store.clone()),
            storage.clone(),
            AuthSettings {
                jwt_secret: JWT_SECRET.to_string(),
                owner_open_id: None,
                identity: None,
                dev_login: false,
                cookie_secure: false,
            },
        );

        Self { store, storage, state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), None)
    }

    pub async fn tenant(&self, name: &str) -> Tenant {
        self.store.insert_tenant(name).await
    }

    pub async fn user(&self, name: &str, role: Role, tenant: &Tenant) -> User {
        self.store.insert_user(name, role, Some(tenant.id)).await
    }

    /// Morador cadastrado, opcionalmente vinculado a uma conta.
    pub async fn resident(&self, tenant: &Tenant, name: &str, unit: &str, account: Option<&User>) -> Resident {
        let resident = ResidentRepository::create(
            &self.store,
            tenant.id,
            &NewResident {
                name: name.to_string(),
                unit_label: unit.to_string(),
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap();

        if let Some(user) = account {
            self.store.link_resident(resident.id, user.id).await.unwrap();
        }
        resident
    }

    pub fn token(&self, user: &User) -> String {
        self.state.auth_service.create_token(user).unwrap()
    }

    pub async fn register_parcel(&self, porter: &User, resident: &Resident) -> Package {
        self.state
            .package_service
            .register(&as_porter(porter), parcel_for(resident))
            .await
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }
}

pub fn ctx(user: &User) -> TenantContext {
    tenant_membership(user.clone()).unwrap()
}

pub fn as_porter(user: &User) -> RequireRole<PorterTier> {
    require_role(ctx(user)).unwrap()
}

pub fn as_manager(user: &User) -> RequireRole<ManagerTier> {
    require_role(ctx(user)).unwrap()
}

pub fn parcel_for(resident: &Resident) -> RegisterPackagePayload {
    RegisterPackagePayload {
        resident_id: resident.id,
        unit: resident.unit_label.clone(),
        kind: PackageKind::Parcel,
        notes: None,
        photo_base64: None,
        photo_mime_type: None,
    }
}

pub fn with_photo(mut payload: RegisterPackagePayload) -> RegisterPackagePayload {
    payload.photo_base64 = Some(STANDARD.encode(b"\xFF\xD8\xFFfake-jpeg"));
    payload.photo_mime_type = Some("image/jpeg".to_string());
    payload
}

pub fn pickup_by(name: &str) -> RegisterPickupPayload {
    RegisterPickupPayload {
        collected_by_name: name.to_string(),
        signature_or_code: None,
        notes: None,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    request("POST", uri, token, Some(body))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn unknown_id() -> Uuid {
    Uuid::new_v4()
}
