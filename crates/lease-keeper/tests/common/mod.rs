#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use lease_keeper::domain::{
    Address, Housing, HousingId, Key, KeyId, Lease, LeaseId, Tenant, TenantId, TenantStatus,
};
use lease_keeper::lifecycle::LeaseDraft;
use lease_keeper::live::LiveStream;
use lease_keeper::repository::{LeaseRepository, RepositoryError, RepositoryResult};
use lease_keeper::store::InMemoryStore;
use lease_keeper::LeaseKeeper;

pub fn housing(rent: i64, charges: i64, deposit: i64) -> Housing {
    Housing {
        address: Address {
            street: "Rue des Lilas".to_string(),
            number: "12".to_string(),
            zip_code: "75011".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
        },
        rent_cents: rent,
        charges_cents: charges,
        deposit_cents: deposit,
        ..Housing::default()
    }
}

pub fn tenant(first: &str, last: &str) -> Tenant {
    Tenant {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some("tenant@example.org".to_string()),
        status: TenantStatus::Active,
        ..Tenant::default()
    }
}

pub fn draft(housing_id: HousingId, tenant_id: TenantId, start: i64) -> LeaseDraft {
    LeaseDraft {
        housing_id: Some(housing_id),
        tenant_id: Some(tenant_id),
        start_date_epoch_day: Some(start),
        rent_cents: 90_000,
        charges_cents: 15_000,
        deposit_cents: 180_000,
        rent_due_day_of_month: 5,
    }
}

pub fn entrance_key() -> Key {
    Key {
        kind: "entrance".to_string(),
        label: Some("front door".to_string()),
        ..Key::default()
    }
}

pub fn keeper() -> (LeaseKeeper<InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (LeaseKeeper::new(store.clone()), store)
}

/// Creates a configured housing and a tenant, returning their ids.
pub async fn seed_parties(keeper: &LeaseKeeper<InMemoryStore>) -> (HousingId, TenantId) {
    let housing_id = keeper
        .housings
        .create_housing(housing(90_000, 15_000, 180_000))
        .await
        .expect("housing created");
    let tenant_id = keeper
        .tenants
        .create_tenant(tenant("Ada", "Lovelace"))
        .await
        .expect("tenant created");
    (housing_id, tenant_id)
}

/// Lease repository that records how many writes reach it and reports every row as existing.
#[derive(Default)]
pub struct RecordingLeases {
    pub writes: AtomicUsize,
    pub existence_checks: AtomicUsize,
    pub created: Mutex<Vec<(Lease, Vec<Key>)>>,
}

impl RecordingLeases {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn existence_checks(&self) -> usize {
        self.existence_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeaseRepository for RecordingLeases {
    async fn create_lease_with_keys(
        &self,
        lease: Lease,
        keys: Vec<Key>,
    ) -> RepositoryResult<LeaseId> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut created = self.created.lock().expect("recording mutex poisoned");
        created.push((lease, keys));
        Ok(LeaseId(created.len() as i64))
    }

    fn observe_active_leases(&self) -> LiveStream<Vec<Lease>> {
        stream::iter(vec![Ok(Vec::new())]).boxed()
    }

    fn observe_active_lease_for_housing(
        &self,
        _housing_id: HousingId,
    ) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Ok(None)]).boxed()
    }

    fn observe_active_lease_for_tenant(&self, _tenant_id: TenantId) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Ok(None)]).boxed()
    }

    fn observe_lease(&self, _id: LeaseId) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Ok(None)]).boxed()
    }

    fn observe_keys_for_lease(&self, _lease_id: LeaseId) -> LiveStream<Vec<Key>> {
        stream::iter(vec![Ok(Vec::new())]).boxed()
    }

    async fn insert_key(&self, _key: Key) -> RepositoryResult<KeyId> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(KeyId(1))
    }

    async fn delete_key_by_id(&self, _id: KeyId) -> RepositoryResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn housing_exists(&self, _id: HousingId) -> RepositoryResult<bool> {
        self.existence_checks.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn tenant_exists(&self, _id: TenantId) -> RepositoryResult<bool> {
        self.existence_checks.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn close_lease(&self, _lease_id: LeaseId, _end_epoch_day: i64) -> RepositoryResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Lease repository whose streams emit `emitted` and then fail, and whose writes fail.
pub struct FailingLeases {
    pub emitted: Vec<Lease>,
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

#[async_trait]
impl LeaseRepository for FailingLeases {
    async fn create_lease_with_keys(
        &self,
        _lease: Lease,
        _keys: Vec<Key>,
    ) -> RepositoryResult<LeaseId> {
        Err(offline())
    }

    fn observe_active_leases(&self) -> LiveStream<Vec<Lease>> {
        stream::iter(vec![
            Ok(self.emitted.clone()),
            Err(offline()),
            Ok(self.emitted.clone()),
        ])
        .boxed()
    }

    fn observe_active_lease_for_housing(
        &self,
        _housing_id: HousingId,
    ) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Ok(None), Err(offline()), Ok(None)]).boxed()
    }

    fn observe_active_lease_for_tenant(&self, _tenant_id: TenantId) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Err(offline())]).boxed()
    }

    fn observe_lease(&self, _id: LeaseId) -> LiveStream<Option<Lease>> {
        stream::iter(vec![Err(offline())]).boxed()
    }

    fn observe_keys_for_lease(&self, _lease_id: LeaseId) -> LiveStream<Vec<Key>> {
        stream::iter(vec![Err(offline())]).boxed()
    }

    async fn insert_key(&self, _key: Key) -> RepositoryResult<KeyId> {
        Err(offline())
    }

    async fn delete_key_by_id(&self, _id: KeyId) -> RepositoryResult<()> {
        Err(offline())
    }

    async fn housing_exists(&self, _id: HousingId) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn tenant_exists(&self, _id: TenantId) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn close_lease(&self, _lease_id: LeaseId, _end_epoch_day: i64) -> RepositoryResult<()> {
        Err(offline())
    }
}
