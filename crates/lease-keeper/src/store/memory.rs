//! In-memory implementation of the housing, tenant and lease repositories.
//!
//! Each table lives in its own [`Subject`], so a mutation re-emits on every live stream that
//! reads the table it touched and on no other. Leases and keys share a table: creating a lease
//! with its keys is a single state transition.
//!
//! Not durable. Ids are generated per table starting at 1.
//!
//! Deleting a housing does not look at the lease table. The active-lease guard belongs to
//! `HousingService::delete_housing`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Housing, HousingId, Key, KeyId, Lease, LeaseId, Tenant, TenantId};
use crate::live::{LiveStream, Subject};
use crate::repository::{
    HousingRepository, LeaseRepository, RepositoryError, RepositoryResult, TenantRepository,
};

#[derive(Debug, Default)]
struct HousingTable {
    next_id: i64,
    rows: BTreeMap<HousingId, Housing>,
}

#[derive(Debug, Default)]
struct TenantTable {
    next_id: i64,
    rows: BTreeMap<TenantId, Tenant>,
}

#[derive(Debug, Default)]
struct LeaseTable {
    next_lease_id: i64,
    next_key_id: i64,
    leases: BTreeMap<LeaseId, Lease>,
    keys: BTreeMap<KeyId, Key>,
}

impl LeaseTable {
    fn active_for(&self, matches: impl Fn(&Lease) -> bool) -> Option<Lease> {
        self.leases
            .values()
            .find(|lease| lease.is_active() && matches(lease))
            .cloned()
    }

    fn allocate_key_id(&mut self) -> KeyId {
        self.next_key_id += 1;
        KeyId(self.next_key_id)
    }
}

fn not_found(entity: &'static str, id: i64) -> RepositoryError {
    RepositoryError::NotFound { entity, id }
}

pub struct InMemoryStore {
    housings: Subject<HousingTable>,
    tenants: Subject<TenantTable>,
    leases: Subject<LeaseTable>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            housings: Subject::new(HousingTable::default()),
            tenants: Subject::new(TenantTable::default()),
            leases: Subject::new(LeaseTable::default()),
        }
    }

    /// Number of live subscriptions currently reading the lease table.
    pub fn lease_subscribers(&self) -> usize {
        self.leases.subscriber_count()
    }

    pub fn lease_count(&self) -> usize {
        self.leases.read(|table| table.leases.len())
    }
}

#[async_trait]
impl HousingRepository for InMemoryStore {
    fn observe_all(&self) -> LiveStream<Vec<Housing>> {
        self.housings.watch(|table| table.rows.values().cloned().collect())
    }

    fn observe_by_id(&self, id: HousingId) -> LiveStream<Option<Housing>> {
        self.housings.watch(move |table| table.rows.get(&id).cloned())
    }

    async fn insert(&self, mut housing: Housing) -> RepositoryResult<HousingId> {
        let id = self.housings.update(|table| {
            table.next_id += 1;
            let id = HousingId(table.next_id);
            housing.id = id;
            table.rows.insert(id, housing);
            Ok(id)
        })?;
        debug!(housing_id = id.0, "housing stored");
        Ok(id)
    }

    async fn update(&self, housing: Housing) -> RepositoryResult<()> {
        self.housings.update(|table| match table.rows.get_mut(&housing.id) {
            Some(row) => {
                *row = housing;
                Ok(())
            }
            None => Err(not_found("housing", housing.id.0)),
        })
    }

    async fn delete_by_id(&self, id: HousingId) -> RepositoryResult<()> {
        self.housings.update(|table| {
            table
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| not_found("housing", id.0))
        })
    }

    async fn has_active_lease(&self, housing_id: HousingId) -> RepositoryResult<bool> {
        Ok(self.leases.read(|table| {
            table
                .active_for(|lease| lease.housing_id == housing_id)
                .is_some()
        }))
    }
}

#[async_trait]
impl TenantRepository for InMemoryStore {
    fn observe_all(&self) -> LiveStream<Vec<Tenant>> {
        self.tenants.watch(|table| table.rows.values().cloned().collect())
    }

    fn observe_by_id(&self, id: TenantId) -> LiveStream<Option<Tenant>> {
        self.tenants.watch(move |table| table.rows.get(&id).cloned())
    }

    async fn insert(&self, mut tenant: Tenant) -> RepositoryResult<TenantId> {
        let id = self.tenants.update(|table| {
            table.next_id += 1;
            let id = TenantId(table.next_id);
            tenant.id = id;
            table.rows.insert(id, tenant);
            Ok(id)
        })?;
        debug!(tenant_id = id.0, "tenant stored");
        Ok(id)
    }

    async fn update(&self, tenant: Tenant) -> RepositoryResult<()> {
        self.tenants.update(|table| match table.rows.get_mut(&tenant.id) {
            Some(row) => {
                *row = tenant;
                Ok(())
            }
            None => Err(not_found("tenant", tenant.id.0)),
        })
    }

    async fn delete_by_id(&self, id: TenantId) -> RepositoryResult<()> {
        self.tenants.update(|table| {
            table
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| not_found("tenant", id.0))
        })
    }
}

#[async_trait]
impl LeaseRepository for InMemoryStore {
    async fn create_lease_with_keys(
        &self,
        mut lease: Lease,
        keys: Vec<Key>,
    ) -> RepositoryResult<LeaseId> {
        let id = self.leases.update(|table| {
            table.next_lease_id += 1;
            let id = LeaseId(table.next_lease_id);
            lease.id = id;
            table.leases.insert(id, lease);
            for mut key in keys {
                key.id = table.allocate_key_id();
                key.lease_id = id;
                table.keys.insert(key.id, key);
            }
            Ok(id)
        })?;
        debug!(lease_id = id.0, "lease stored with its keys");
        Ok(id)
    }

    fn observe_active_leases(&self) -> LiveStream<Vec<Lease>> {
        self.leases.watch(|table| {
            table
                .leases
                .values()
                .filter(|lease| lease.is_active())
                .cloned()
                .collect()
        })
    }

    fn observe_active_lease_for_housing(&self, housing_id: HousingId) -> LiveStream<Option<Lease>> {
        self.leases.watch(move |table| table.active_for(|lease| lease.housing_id == housing_id))
    }

    fn observe_active_lease_for_tenant(&self, tenant_id: TenantId) -> LiveStream<Option<Lease>> {
        self.leases.watch(move |table| table.active_for(|lease| lease.tenant_id == tenant_id))
    }

    fn observe_lease(&self, id: LeaseId) -> LiveStream<Option<Lease>> {
        self.leases.watch(move |table| table.leases.get(&id).cloned())
    }

    fn observe_keys_for_lease(&self, lease_id: LeaseId) -> LiveStream<Vec<Key>> {
        self.leases.watch(move |table| {
            table
                .keys
                .values()
                .filter(|key| key.lease_id == lease_id)
                .cloned()
                .collect()
        })
    }

    async fn insert_key(&self, mut key: Key) -> RepositoryResult<KeyId> {
        self.leases.update(|table| {
            if !table.leases.contains_key(&key.lease_id) {
                return Err(not_found("lease", key.lease_id.0));
            }
            key.id = table.allocate_key_id();
            let id = key.id;
            table.keys.insert(id, key);
            Ok(id)
        })
    }

    async fn delete_key_by_id(&self, id: KeyId) -> RepositoryResult<()> {
        self.leases.update(|table| {
            table
                .keys
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| not_found("key", id.0))
        })
    }

    async fn housing_exists(&self, id: HousingId) -> RepositoryResult<bool> {
        Ok(self.housings.read(|table| table.rows.contains_key(&id)))
    }

    async fn tenant_exists(&self, id: TenantId) -> RepositoryResult<bool> {
        Ok(self.tenants.read(|table| table.rows.contains_key(&id)))
    }

    async fn close_lease(&self, lease_id: LeaseId, end_epoch_day: i64) -> RepositoryResult<()> {
        self.leases.update(|table| match table.leases.get_mut(&lease_id) {
            Some(lease) => {
                lease.end_date_epoch_day = Some(end_epoch_day);
                Ok(())
            }
            None => Err(not_found("lease", lease_id.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn lease(housing: i64, tenant: i64) -> Lease {
        Lease {
            housing_id: HousingId(housing),
            tenant_id: TenantId(tenant),
            start_date_epoch_day: 19_000,
            rent_cents: 90_000,
            rent_due_day_of_month: 5,
            index_anniversary_epoch_day: Some(19_000),
            ..Lease::default()
        }
    }

    #[tokio::test]
    async fn lease_and_keys_are_committed_together() {
        let store = InMemoryStore::new();
        let mut keys_live = store.observe_keys_for_lease(LeaseId(1));
        assert_eq!(keys_live.next().await, Some(Ok(Vec::new())));

        let keys = vec![
            Key {
                kind: "entrance".to_string(),
                ..Key::default()
            },
            Key {
                kind: "mailbox".to_string(),
                ..Key::default()
            },
        ];
        let id = store
            .create_lease_with_keys(lease(1, 1), keys)
            .await
            .expect("lease stored");
        assert_eq!(id, LeaseId(1));

        let stored = keys_live
            .next()
            .await
            .expect("emission")
            .expect("keys readable");
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|key| key.lease_id == id));
    }

    #[tokio::test]
    async fn closing_a_lease_clears_the_housing_projection() {
        let store = InMemoryStore::new();
        let id = store
            .create_lease_with_keys(lease(3, 4), Vec::new())
            .await
            .expect("lease stored");

        let mut active = store.observe_active_lease_for_housing(HousingId(3));
        let first = active.next().await.expect("emission").expect("readable");
        assert_eq!(first.map(|lease| lease.id), Some(id));

        store.close_lease(id, 19_500).await.expect("closes");
        assert_eq!(active.next().await, Some(Ok(None)));
        assert!(!store
            .has_active_lease(HousingId(3))
            .await
            .expect("query succeeds"));
    }

    #[tokio::test]
    async fn key_for_unknown_lease_is_rejected() {
        let store = InMemoryStore::new();
        let key = Key {
            lease_id: LeaseId(9),
            kind: "garage".to_string(),
            ..Key::default()
        };
        assert_eq!(
            store.insert_key(key).await,
            Err(RepositoryError::NotFound {
                entity: "lease",
                id: 9
            })
        );
    }

    #[tokio::test]
    async fn updating_missing_housing_reports_not_found() {
        let store = InMemoryStore::new();
        let housing = Housing {
            id: HousingId(42),
            ..Housing::default()
        };
        assert!(matches!(
            HousingRepository::update(&store, housing).await,
            Err(RepositoryError::NotFound { entity: "housing", id: 42 })
        ));
    }
}
