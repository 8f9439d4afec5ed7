use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::validation::{self, ValidationError};
use super::LifecycleError;
use crate::domain::{HousingId, Key, KeyId, Lease, LeaseId, TenantId};
use crate::live::LiveStream;
use crate::repository::LeaseRepository;

/// Lease fields as captured before validation. Required references stay optional here so that
/// their absence is reported as a rule violation rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseDraft {
    #[serde(default)]
    pub housing_id: Option<HousingId>,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub start_date_epoch_day: Option<i64>,
    #[serde(default)]
    pub rent_cents: i64,
    #[serde(default)]
    pub charges_cents: i64,
    #[serde(default)]
    pub deposit_cents: i64,
    #[serde(default)]
    pub rent_due_day_of_month: i32,
}

/// Creation and closure of leases, plus management of the keys handed over with them.
pub struct LeaseService<L> {
    leases: Arc<L>,
}

impl<L> LeaseService<L>
where
    L: LeaseRepository + 'static,
{
    pub fn new(leases: Arc<L>) -> Self {
        Self { leases }
    }

    /// Validates the draft, then persists the lease and its keys in one atomic call.
    ///
    /// Checks run in a fixed order and stop at the first failure: housing reference, tenant
    /// reference, start date and its calendar range, due day, then existence of the housing and
    /// of the tenant in the repository. The new lease is active and its indexation anniversary
    /// is its start date.
    pub async fn create_lease(
        &self,
        draft: LeaseDraft,
        keys: Vec<Key>,
    ) -> Result<LeaseId, LifecycleError> {
        let housing_id = validation::require_housing(draft.housing_id)?;
        let tenant_id = validation::require_tenant(draft.tenant_id)?;
        let start_date_epoch_day = validation::start_date(draft.start_date_epoch_day)?;
        let rent_due_day_of_month = validation::rent_due_day(draft.rent_due_day_of_month)?;

        if !self.leases.housing_exists(housing_id).await? {
            return Err(ValidationError::HousingNotFound { housing_id }.into());
        }
        if !self.leases.tenant_exists(tenant_id).await? {
            return Err(ValidationError::TenantNotFound { tenant_id }.into());
        }

        let lease = Lease {
            id: LeaseId::default(),
            remote_id: None,
            housing_id,
            tenant_id,
            start_date_epoch_day,
            end_date_epoch_day: None,
            rent_cents: draft.rent_cents,
            charges_cents: draft.charges_cents,
            deposit_cents: draft.deposit_cents,
            rent_due_day_of_month,
            index_anniversary_epoch_day: Some(start_date_epoch_day),
        };

        let key_count = keys.len();
        let lease_id = self.leases.create_lease_with_keys(lease, keys).await?;
        info!(
            lease_id = lease_id.0,
            housing_id = housing_id.0,
            tenant_id = tenant_id.0,
            keys = key_count,
            "lease created"
        );
        Ok(lease_id)
    }

    /// Ends a lease on `end_epoch_day`. Closing an already closed lease overwrites its end date.
    pub async fn close_lease(
        &self,
        lease_id: LeaseId,
        end_epoch_day: i64,
    ) -> Result<(), LifecycleError> {
        let lease_id = validation::require_lease(lease_id)?;
        if end_epoch_day < 0 {
            return Err(ValidationError::EndDateBeforeEpoch { end_epoch_day }.into());
        }

        self.leases.close_lease(lease_id, end_epoch_day).await?;
        info!(lease_id = lease_id.0, end_epoch_day, "lease closed");
        Ok(())
    }

    pub async fn add_key(&self, lease_id: LeaseId, mut key: Key) -> Result<KeyId, LifecycleError> {
        key.lease_id = validation::require_lease(lease_id)?;
        validation::not_blank(&key.kind, ValidationError::KeyKindRequired)?;

        let key_id = self.leases.insert_key(key).await?;
        debug!(lease_id = lease_id.0, key_id = key_id.0, "key added");
        Ok(key_id)
    }

    pub async fn remove_key(&self, key_id: KeyId) -> Result<(), LifecycleError> {
        self.leases.delete_key_by_id(key_id).await?;
        debug!(key_id = key_id.0, "key removed");
        Ok(())
    }

    pub fn observe_lease(&self, lease_id: LeaseId) -> LiveStream<Option<Lease>> {
        self.leases.observe_lease(lease_id)
    }

    pub fn observe_keys(&self, lease_id: LeaseId) -> LiveStream<Vec<Key>> {
        self.leases.observe_keys_for_lease(lease_id)
    }
}
