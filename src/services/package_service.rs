// src/services/package_service.rs

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::{AppError, AppResult},
    db::{PackageRepository, PickupRepository, ResidentRepository},
    middleware::{
        rbac::{PorterTier, RequireRole},
        tenancy::TenantContext,
    },
    models::{
        auth::Role,
        packages::{
            NewPackage, NewPickup, Package, PackageStatus, PhotoUpload, Pickup,
            RegisterPackagePayload, RegisterPickupPayload,
        },
    },
    services::{
        notification_service::NotificationService,
        storage::{ObjectStorage, StoredObject, photo_key},
    },
};

#[derive(Clone)]
pub struct PackageService {
    packages: Arc<dyn PackageRepository>,
    pickups: Arc<dyn PickupRepository>,
    residents: Arc<dyn ResidentRepository>,
    storage: Arc<dyn ObjectStorage>,
    notifications: NotificationService,
}

impl PackageService {
    pub fn new(
        packages: Arc<dyn PackageRepository>,
        pickups: Arc<dyn PickupRepository>,
        residents: Arc<dyn ResidentRepository>,
        storage: Arc<dyn ObjectStorage>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            packages,
            pickups,
            residents,
            storage,
            notifications,
        }
    }

    /// LÓGICA DE NEGÓCIO: registra a encomenda na portaria.
    ///
    /// A foto (se houver) é gravada antes da encomenda: se o upload falhar,
    /// nada é criado. A notificação ao morador é melhor esforço.
    pub async fn register(
        &self,
        guard: &RequireRole<PorterTier>,
        payload: RegisterPackagePayload,
    ) -> AppResult<Package> {
        let ctx = guard.context();
        let tenant_id = ctx.tenant_id();

        // 1. O morador precisa existir neste condomínio
        let resident = self
            .residents
            .get_by_id(payload.resident_id, tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Resident not found.".into()))?;

        // 2. Upload da foto
        let stored = match payload.photo() {
            Some(photo) => Some(self.upload_photo(tenant_id, photo).await?),
            None => None,
        };

        // 3. Cria a encomenda com os "snapshots" de apartamento e porteiro
        let package = self
            .packages
            .create(&NewPackage {
                tenant_id,
                resident_id: resident.id,
                unit_label: payload.unit,
                kind: payload.kind,
                photo_url: stored.as_ref().map(|s| s.url.clone()),
                photo_storage_key: stored.map(|s| s.key),
                notes: payload.notes,
                registered_by_user_id: ctx.user().id,
                registered_by_name: ctx.user().display_name(),
            })
            .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            package_id = %package.id,
            resident_id = %resident.id,
            "📦 Encomenda registrada"
        );

        // 4. Notifica o morador, se ele tiver conta vinculada
        if let Some(recipient) = resident.linked_user_id {
            self.notifications.notify_new_package(recipient, &package).await;
        }

        Ok(package)
    }

    async fn upload_photo(&self, tenant_id: Uuid, photo: PhotoUpload) -> AppResult<StoredObject> {
        // Aceita tanto base64 puro quanto "data:image/...;base64,..."
        let encoded = photo
            .base64
            .split_once("base64,")
            .map_or(photo.base64.as_str(), |(_, data)| data);

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AppError::BadRequest("Photo is not valid base64.".into()))?;

        let key = photo_key(tenant_id, &photo.mime_type);
        self.storage
            .put(&key, bytes, &photo.mime_type)
            .await
            .map_err(|e| match e {
                AppError::BadRequest(_) => e,
                other => {
                    tracing::error!(tenant_id = %tenant_id, key = %key, "Falha no upload da foto: {}", other);
                    AppError::Unavailable("Photo storage is unavailable.".into())
                }
            })
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> AppResult<Package> {
        self.packages
            .get_by_id(id, ctx.tenant_id())
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found.".into()))
    }

    pub async fn list_pending(&self, ctx: &TenantContext) -> AppResult<Vec<Package>> {
        self.packages.list_pending(ctx.tenant_id()).await
    }

    /// Moradores só podem ver as próprias encomendas.
    pub async fn list_by_resident(&self, ctx: &TenantContext, resident_id: Uuid) -> AppResult<Vec<Package>> {
        if ctx.user().role == Role::Resident {
            let own = self
                .residents
                .find_by_linked_user(ctx.user().id, ctx.tenant_id())
                .await?;

            if own.map(|r| r.id) != Some(resident_id) {
                return Err(AppError::Forbidden(
                    "Residents can only view their own packages.".into(),
                ));
            }
        }

        self.packages.list_by_resident(resident_id, ctx.tenant_id()).await
    }

    pub async fn list_by_period(
        &self,
        ctx: &TenantContext,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Package>> {
        if start > end {
            return Err(AppError::BadRequest("Period start must not be after its end.".into()));
        }
        self.packages.list_by_period(ctx.tenant_id(), start, end).await
    }

    /// LÓGICA DE NEGÓCIO: registra a retirada (pending -> collected).
    pub async fn register_pickup(
        &self,
        guard: &RequireRole<PorterTier>,
        package_id: Uuid,
        payload: RegisterPickupPayload,
    ) -> AppResult<Pickup> {
        let ctx = guard.context();
        let tenant_id = ctx.tenant_id();

        let collected_by = payload.collected_by_name.trim().to_string();
        if collected_by.is_empty() {
            return Err(AppError::BadRequest("Collector name is required.".into()));
        }

        // 1. Encomenda existe e ainda está pendente?
        let package = self
            .packages
            .get_by_id(package_id, tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found.".into()))?;

        if package.status == PackageStatus::Collected {
            return Err(AppError::BadRequest("Package already collected.".into()));
        }

        // 2. Retirada + transição numa unidade atômica (a perdedora de uma
        //    corrida recebe Conflict daqui)
        let pickup = self
            .pickups
            .record(&NewPickup {
                tenant_id,
                package_id,
                collected_by_name: collected_by,
                signature_or_code: payload.signature_or_code,
                notes: payload.notes,
                recorded_by_user_id: Some(ctx.user().id),
                recorded_by_name: ctx.user().display_name(),
            })
            .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            package_id = %package_id,
            pickup_id = %pickup.id,
            "✅ Retirada registrada"
        );

        // 3. Notifica o morador (melhor esforço, inclusive a busca do morador)
        match self.residents.get_by_id(package.resident_id, tenant_id).await {
            Ok(Some(resident)) => {
                if let Some(recipient) = resident.linked_user_id {
                    self.notifications
                        .notify_collected(recipient, &package, &pickup.collected_by_name)
                        .await;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(package_id = %package_id, "⚠️ Morador não carregado para notificação: {}", e);
            }
        }

        Ok(pickup)
    }

    pub async fn get_pickup(&self, ctx: &TenantContext, package_id: Uuid) -> AppResult<Pickup> {
        self.pickups
            .find_by_package(package_id, ctx.tenant_id())
            .await?
            .ok_or_else(|| AppError::NotFound("Pickup not found.".into()))
    }
}
