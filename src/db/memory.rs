//! Backend em memória dos repositórios.
//!
//! Usado quando `DATABASE_URL` não está definida (desenvolvimento local) e
//! pela suíte de testes. Segue os mesmos contratos do Postgres: filtro por
//! tenant em toda leitura/escrita e retirada única por encomenda, verificada
//! e gravada sob o mesmo lock.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::{AppError, AppResult},
    db::{
        NotificationRepository, PackageRepository, PickupRepository, ResidentRepository,
        TenantRepository, UserRepository, pickup_repo::PICKUP_CONFLICT,
    },
    models::{
        auth::{Role, UpsertUser, User},
        dashboard::PeriodCounts,
        notifications::{NewNotification, Notification},
        packages::{NewPackage, NewPickup, Package, PackageStatus, Pickup},
        residents::{NewResident, Resident},
        tenancy::Tenant,
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tenants: HashMap<Uuid, Tenant>,
    residents: HashMap<Uuid, Resident>,
    packages: HashMap<Uuid, Package>,
    pickups: HashMap<Uuid, Pickup>,
    notifications: HashMap<Uuid, Notification>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---
    // Carga inicial e inspeção para testes e desenvolvimento local. Não fazem
    // parte dos repositórios: a atribuição de papel e condomínio é feita fora
    // da API, e o backend Postgres não tem equivalente.
    // ---

    /// Cria um condomínio direto nas tabelas (sem endereço nem telefone).
    pub async fn insert_tenant(&self, name: &str) -> Tenant {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: None,
            phone: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.tenants.insert(tenant.id, tenant.clone());
        tenant
    }

    /// Cria um usuário já com papel e condomínio, como faria o administrador.
    pub async fn insert_user(&self, name: &str, role: Role, tenant_id: Option<Uuid>) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            open_id: format!("memory|{}", Uuid::new_v4()),
            name: Some(name.to_string()),
            email: None,
            login_method: None,
            role,
            tenant_id,
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        };
        self.tables.write().await.users.insert(user.id, user.clone());
        user
    }

    /// Vincula um morador a uma conta de usuário.
    pub async fn link_resident(&self, resident_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let resident = tables
            .residents
            .get_mut(&resident_id)
            .ok_or_else(|| AppError::NotFound("Resident not found.".into()))?;
        resident.linked_user_id = Some(user_id);
        resident.updated_at = Utc::now();
        Ok(())
    }

    /// Quantas retiradas existem para a encomenda, em qualquer condomínio.
    pub async fn pickup_count(&self, package_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .pickups
            .values()
            .filter(|p| p.package_id == package_id)
            .count()
    }

    /// Total de notificações do condomínio, lidas ou não.
    pub async fn notification_count(&self, tenant_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .notifications
            .values()
            .filter(|n| n.tenant_id == tenant_id)
            .count()
    }
}

fn newest_first<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
    rows
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert(&self, input: &UpsertUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(user) = tables.users.values_mut().find(|u| u.open_id == input.open_id) {
            if input.name.is_some() {
                user.name = input.name.clone();
            }
            if input.email.is_some() {
                user.email = input.email.clone();
            }
            if input.login_method.is_some() {
                user.login_method = input.login_method.clone();
            }
            if input.force_admin {
                user.role = Role::Admin;
            }
            user.last_signed_in = now;
            user.updated_at = now;
            return Ok(user.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            open_id: input.open_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            login_method: input.login_method.clone(),
            role: if input.force_admin { Role::Admin } else { Role::Resident },
            tenant_id: None,
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.tenant_id == Some(tenant_id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        Ok(self.tables.read().await.tenants.get(&id).cloned())
    }
}

#[async_trait]
impl ResidentRepository for MemoryStore {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Resident>> {
        let tables = self.tables.read().await;
        let mut residents: Vec<Resident> = tables
            .residents
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        residents.sort_by(|a, b| a.unit_label.cmp(&b.unit_label).then_with(|| a.name.cmp(&b.name)));
        Ok(residents)
    }

    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>> {
        let tables = self.tables.read().await;
        Ok(tables
            .residents
            .get(&id)
            .filter(|r| r.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_by_linked_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Resident>> {
        let tables = self.tables.read().await;
        Ok(tables
            .residents
            .values()
            .filter(|r| r.tenant_id == tenant_id && r.linked_user_id == Some(user_id))
            .min_by_key(|r| r.created_at)
            .cloned())
    }

    async fn create(&self, tenant_id: Uuid, input: &NewResident) -> AppResult<Resident> {
        let now = Utc::now();
        let resident = Resident {
            id: Uuid::new_v4(),
            tenant_id,
            name: input.name.clone(),
            unit_label: input.unit_label.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            linked_user_id: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .residents
            .insert(resident.id, resident.clone());
        Ok(resident)
    }
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn create(&self, input: &NewPackage) -> AppResult<Package> {
        let now = Utc::now();
        let package = Package {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            resident_id: input.resident_id,
            unit_label: input.unit_label.clone(),
            kind: input.kind,
            photo_url: input.photo_url.clone(),
            photo_storage_key: input.photo_storage_key.clone(),
            notes: input.notes.clone(),
            status: PackageStatus::Pending,
            registered_by_user_id: input.registered_by_user_id,
            registered_by_name: input.registered_by_name.clone(),
            registered_at: now,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .packages
            .insert(package.id, package.clone());
        Ok(package)
    }

    async fn get_by_id(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Package>> {
        let tables = self.tables.read().await;
        Ok(tables
            .packages
            .get(&id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_pending(&self, tenant_id: Uuid) -> AppResult<Vec<Package>> {
        let tables = self.tables.read().await;
        let packages = tables
            .packages
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.status == PackageStatus::Pending)
            .cloned()
            .collect();
        Ok(newest_first(packages, |p| p.registered_at))
    }

    async fn list_by_resident(&self, resident_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Package>> {
        let tables = self.tables.read().await;
        let packages = tables
            .packages
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.resident_id == resident_id)
            .cloned()
            .collect();
        Ok(newest_first(packages, |p| p.registered_at))
    }

    async fn list_by_period(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Package>> {
        let tables = self.tables.read().await;
        let packages = tables
            .packages
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.registered_at >= start && p.registered_at <= end)
            .cloned()
            .collect();
        Ok(newest_first(packages, |p| p.registered_at))
    }

    async fn count_pending(&self, tenant_id: Uuid) -> AppResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .packages
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.status == PackageStatus::Pending)
            .count();
        Ok(count as i64)
    }

    async fn period_counts(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<PeriodCounts> {
        let tables = self.tables.read().await;
        let counts = tables
            .packages
            .values()
            .filter(|p| p.tenant_id == tenant_id && p.registered_at >= start && p.registered_at <= end)
            .fold(PeriodCounts::default(), |mut acc, p| {
                acc.total += 1;
                if p.status == PackageStatus::Collected {
                    acc.collected += 1;
                }
                acc
            });
        Ok(counts)
    }
}

#[async_trait]
impl PickupRepository for MemoryStore {
    async fn record(&self, input: &NewPickup) -> AppResult<Pickup> {
        let mut tables = self.tables.write().await;

        if tables.pickups.values().any(|p| p.package_id == input.package_id) {
            return Err(AppError::Conflict(PICKUP_CONFLICT.to_string()));
        }

        let now = Utc::now();
        let package = tables
            .packages
            .get_mut(&input.package_id)
            .filter(|p| p.tenant_id == input.tenant_id && p.status == PackageStatus::Pending)
            .ok_or_else(|| AppError::Conflict(PICKUP_CONFLICT.to_string()))?;
        package.status = PackageStatus::Collected;
        package.updated_at = now;

        let pickup = Pickup {
            id: Uuid::new_v4(),
            package_id: input.package_id,
            tenant_id: input.tenant_id,
            collected_by_name: input.collected_by_name.clone(),
            signature_or_code: input.signature_or_code.clone(),
            notes: input.notes.clone(),
            recorded_by_user_id: input.recorded_by_user_id,
            recorded_by_name: input.recorded_by_name.clone(),
            collected_at: now,
            created_at: now,
        };
        tables.pickups.insert(pickup.id, pickup.clone());
        Ok(pickup)
    }

    async fn find_by_package(&self, package_id: Uuid, tenant_id: Uuid) -> AppResult<Option<Pickup>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pickups
            .values()
            .find(|p| p.package_id == package_id && p.tenant_id == tenant_id)
            .cloned())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, input: &NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            recipient_user_id: input.recipient_user_id,
            resident_id: input.resident_id,
            package_id: input.package_id,
            kind: input.kind,
            title: input.title.clone(),
            body: input.body.clone(),
            read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let notifications = tables
            .notifications
            .values()
            .filter(|n| n.recipient_user_id == user_id && n.tenant_id == tenant_id)
            .cloned()
            .collect();
        Ok(newest_first(notifications, |n| n.created_at))
    }

    async fn list_unread(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let notifications = tables
            .notifications
            .values()
            .filter(|n| n.recipient_user_id == user_id && n.tenant_id == tenant_id && !n.read)
            .cloned()
            .collect();
        Ok(newest_first(notifications, |n| n.created_at))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid, tenant_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .notifications
            .get_mut(&id)
            .filter(|n| n.recipient_user_id == user_id && n.tenant_id == tenant_id)
        {
            Some(notification) => {
                notification.read = true;
                notification.read_at.get_or_insert_with(Utc::now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid, tenant_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut marked = 0;
        for notification in tables
            .notifications
            .values_mut()
            .filter(|n| n.recipient_user_id == user_id && n.tenant_id == tenant_id && !n.read)
        {
            notification.read = true;
            notification.read_at = Some(now);
            marked += 1;
        }
        Ok(marked)
    }
}
