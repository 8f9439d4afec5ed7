use async_trait::async_trait;

use crate::domain::{Housing, HousingId, Key, KeyId, Lease, LeaseId, Tenant, TenantId};
use crate::live::LiveStream;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failure reported by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage of housing units.
#[async_trait]
pub trait HousingRepository: Send + Sync {
    fn observe_all(&self) -> LiveStream<Vec<Housing>>;
    fn observe_by_id(&self, id: HousingId) -> LiveStream<Option<Housing>>;
    /// Persists a new unit and returns its generated id. The incoming id is ignored.
    async fn insert(&self, housing: Housing) -> RepositoryResult<HousingId>;
    async fn update(&self, housing: Housing) -> RepositoryResult<()>;
    async fn delete_by_id(&self, id: HousingId) -> RepositoryResult<()>;
    async fn has_active_lease(&self, housing_id: HousingId) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    fn observe_all(&self) -> LiveStream<Vec<Tenant>>;
    fn observe_by_id(&self, id: TenantId) -> LiveStream<Option<Tenant>>;
    async fn insert(&self, tenant: Tenant) -> RepositoryResult<TenantId>;
    async fn update(&self, tenant: Tenant) -> RepositoryResult<()>;
    async fn delete_by_id(&self, id: TenantId) -> RepositoryResult<()>;
}

/// Storage of leases and the keys handed over with them.
#[async_trait]
pub trait LeaseRepository: Send + Sync {
    /// Commits the lease and its keys together or not at all.
    async fn create_lease_with_keys(&self, lease: Lease, keys: Vec<Key>)
        -> RepositoryResult<LeaseId>;
    fn observe_active_leases(&self) -> LiveStream<Vec<Lease>>;
    fn observe_active_lease_for_housing(&self, housing_id: HousingId) -> LiveStream<Option<Lease>>;
    fn observe_active_lease_for_tenant(&self, tenant_id: TenantId) -> LiveStream<Option<Lease>>;
    fn observe_lease(&self, id: LeaseId) -> LiveStream<Option<Lease>>;
    fn observe_keys_for_lease(&self, lease_id: LeaseId) -> LiveStream<Vec<Key>>;
    async fn insert_key(&self, key: Key) -> RepositoryResult<KeyId>;
    async fn delete_key_by_id(&self, id: KeyId) -> RepositoryResult<()>;
    async fn housing_exists(&self, id: HousingId) -> RepositoryResult<bool>;
    async fn tenant_exists(&self, id: TenantId) -> RepositoryResult<bool>;
    async fn close_lease(&self, lease_id: LeaseId, end_epoch_day: i64) -> RepositoryResult<()>;
}
