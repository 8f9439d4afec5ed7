use std::sync::Arc;

use tracing::{info, warn};

use super::validation::ValidationError;
use super::LifecycleError;
use crate::domain::{Housing, HousingId};
use crate::live::LiveStream;
use crate::repository::HousingRepository;

pub struct HousingService<H> {
    housings: Arc<H>,
}

impl<H> HousingService<H>
where
    H: HousingRepository + 'static,
{
    pub fn new(housings: Arc<H>) -> Self {
        Self { housings }
    }

    pub async fn create_housing(&self, housing: Housing) -> Result<HousingId, LifecycleError> {
        let id = self.housings.insert(housing).await?;
        info!(housing_id = id.0, "housing created");
        Ok(id)
    }

    pub async fn update_housing(&self, housing: Housing) -> Result<(), LifecycleError> {
        self.housings.update(housing).await?;
        Ok(())
    }

    /// Deletes a housing unit unless an active lease still references it.
    ///
    /// The active-lease check and the delete are two separate repository calls; a lease
    /// created in between is not detected.
    pub async fn delete_housing(&self, id: HousingId) -> Result<(), LifecycleError> {
        if self.housings.has_active_lease(id).await? {
            warn!(housing_id = id.0, "housing deletion refused: active lease");
            return Err(ValidationError::HousingHasActiveLease { housing_id: id }.into());
        }

        self.housings.delete_by_id(id).await?;
        info!(housing_id = id.0, "housing deleted");
        Ok(())
    }

    pub fn observe_housings(&self) -> LiveStream<Vec<Housing>> {
        self.housings.observe_all()
    }

    pub fn observe_housing(&self, id: HousingId) -> LiveStream<Option<Housing>> {
        self.housings.observe_by_id(id)
    }
}
