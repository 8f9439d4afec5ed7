use std::sync::Arc;

use tracing::{debug, info};

use super::validation::{self, ValidationError};
use super::LifecycleError;
use crate::domain::{Tenant, TenantId};
use crate::live::LiveStream;
use crate::repository::TenantRepository;

pub struct TenantService<T> {
    tenants: Arc<T>,
}

impl<T> TenantService<T>
where
    T: TenantRepository + 'static,
{
    pub fn new(tenants: Arc<T>) -> Self {
        Self { tenants }
    }

    pub async fn create_tenant(&self, tenant: Tenant) -> Result<TenantId, LifecycleError> {
        validate_names(&tenant)?;
        let id = self.tenants.insert(tenant).await?;
        info!(tenant_id = id.0, "tenant created");
        Ok(id)
    }

    pub async fn update_tenant(&self, tenant: Tenant) -> Result<(), LifecycleError> {
        validate_names(&tenant)?;
        self.tenants.update(tenant).await?;
        Ok(())
    }

    /// Tenants are deleted without looking at their leases.
    pub async fn delete_tenant(&self, id: TenantId) -> Result<(), LifecycleError> {
        self.tenants.delete_by_id(id).await?;
        info!(tenant_id = id.0, "tenant deleted");
        Ok(())
    }

    pub fn observe_tenants(&self) -> LiveStream<Vec<Tenant>> {
        self.tenants.observe_all()
    }

    pub fn observe_tenant(&self, id: TenantId) -> LiveStream<Option<Tenant>> {
        self.tenants.observe_by_id(id)
    }
}

fn validate_names(tenant: &Tenant) -> Result<(), ValidationError> {
    let checked = validation::not_blank(&tenant.first_name, ValidationError::FirstNameRequired)
        .and_then(|_| validation::not_blank(&tenant.last_name, ValidationError::LastNameRequired));
    if let Err(violation) = &checked {
        debug!(tenant_id = tenant.id.0, %violation, "tenant rejected");
    }
    checked
}
