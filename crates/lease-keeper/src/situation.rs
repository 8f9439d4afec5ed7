//! Live occupancy and tenancy status derived from the active-lease streams.

use std::sync::Arc;

use futures::StreamExt;
use tracing::warn;

use crate::domain::{Housing, HousingSituation, Lease, Tenant, TenantSituation};
use crate::live::{terminate_on_error, LiveStream, Observation, StreamError};
use crate::repository::LeaseRepository;

pub struct SituationObserver<L> {
    leases: Arc<L>,
}

impl<L> SituationObserver<L>
where
    L: LeaseRepository + 'static,
{
    pub fn new(leases: Arc<L>) -> Self {
        Self { leases }
    }

    /// Re-derives the situation of `housing` once per emission of its active-lease stream.
    pub fn observe_housing_situation(&self, housing: Housing) -> Observation<HousingSituation> {
        let upstream = self.leases.observe_active_lease_for_housing(housing.id);
        derive(upstream, "housing_situation", move |lease| {
            HousingSituation::derive(&housing, lease)
        })
    }

    pub fn observe_tenant_situation(&self, tenant: Tenant) -> Observation<TenantSituation> {
        let upstream = self.leases.observe_active_lease_for_tenant(tenant.id);
        derive(upstream, "tenant_situation", move |lease| {
            TenantSituation::derive(&tenant, lease)
        })
    }
}

fn derive<S, F>(
    upstream: LiveStream<Option<Lease>>,
    observation: &'static str,
    project: F,
) -> Observation<S>
where
    S: Send + 'static,
    F: Fn(Option<&Lease>) -> S + Send + 'static,
{
    terminate_on_error(upstream)
        .map(move |item| match item {
            Ok(lease) => Ok(project(lease.as_ref())),
            Err(source) => {
                warn!(observation, error = %source, "live observation failed");
                Err(StreamError::from(source))
            }
        })
        .boxed()
}
