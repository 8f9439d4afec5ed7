use std::sync::Arc;

use crate::indexation::IndexationScheduler;
use crate::lifecycle::{HousingService, LeaseService, TenantService};
use crate::repository::{HousingRepository, LeaseRepository, TenantRepository};
use crate::situation::SituationObserver;

/// Every use-case and observer wired onto a single backend.
pub struct LeaseKeeper<S> {
    pub housings: HousingService<S>,
    pub tenants: TenantService<S>,
    pub leases: LeaseService<S>,
    pub situations: SituationObserver<S>,
    pub indexations: IndexationScheduler<S>,
}

impl<S> LeaseKeeper<S>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            housings: HousingService::new(store.clone()),
            tenants: TenantService::new(store.clone()),
            leases: LeaseService::new(store.clone()),
            situations: SituationObserver::new(store.clone()),
            indexations: IndexationScheduler::new(store),
        }
    }
}
