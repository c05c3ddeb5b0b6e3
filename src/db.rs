// src/db.rs

use std::sync::Arc;

use sqlx::PgPool;

pub mod memory;
pub mod notification_repo;
pub mod package_repo;
pub mod pickup_repo;
pub mod resident_repo;
pub mod tenancy_repo;
pub mod user_repo;

pub use memory::MemoryStore;
pub use notification_repo::{NotificationRepository, PgNotificationRepository};
pub use package_repo::{PackageRepository, PgPackageRepository};
pub use pickup_repo::{PgPickupRepository, PickupRepository};
pub use resident_repo::{PgResidentRepository, ResidentRepository};
pub use tenancy_repo::{PgTenantRepository, TenantRepository};
pub use user_repo::{PgUserRepository, UserRepository};

/// Conjunto de repositórios usado para montar os serviços.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub residents: Arc<dyn ResidentRepository>,
    pub packages: Arc<dyn PackageRepository>,
    pub pickups: Arc<dyn PickupRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            tenants: Arc::new(PgTenantRepository::new(pool.clone())),
            residents: Arc::new(PgResidentRepository::new(pool.clone())),
            packages: Arc::new(PgPackageRepository::new(pool.clone())),
            pickups: Arc::new(PgPickupRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool)),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            tenants: Arc::new(store.clone()),
            residents: Arc::new(store.clone()),
            packages: Arc::new(store.clone()),
            pickups: Arc::new(store.clone()),
            notifications: Arc::new(store),
        }
    }
}
