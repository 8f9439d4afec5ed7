use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::housing::{Housing, HousingId};
use super::lease::{Lease, LeaseId};
use super::tenant::{Tenant, TenantId, TenantStatus};

/// Occupancy of a housing unit, derived from its active lease and financial setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HousingSituation {
    #[serde(rename = "OCCUPE")]
    Occupied,
    #[serde(rename = "LIBRE")]
    Vacant,
    #[serde(rename = "DRAFT")]
    Draft,
}

impl HousingSituation {
    pub fn derive(housing: &Housing, active_lease: Option<&Lease>) -> Self {
        match active_lease {
            Some(_) => Self::Occupied,
            None if housing.is_unconfigured() => Self::Draft,
            None => Self::Vacant,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupied => "occupied",
            Self::Vacant => "vacant",
            Self::Draft => "draft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSituation {
    pub status: TenantStatus,
    pub has_active_lease: bool,
}

impl TenantSituation {
    pub fn derive(tenant: &Tenant, active_lease: Option<&Lease>) -> Self {
        Self {
            status: tenant.status,
            has_active_lease: active_lease.is_some(),
        }
    }
}

/// Next yearly rent review of an active lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingIndexation {
    pub lease_id: LeaseId,
    pub housing_id: HousingId,
    pub tenant_id: TenantId,
    pub next_indexation_epoch_day: i64,
    /// `0` means the review is due today.
    pub days_until: i64,
}

impl UpcomingIndexation {
    pub fn next_indexation_date(&self) -> Option<NaiveDate> {
        crate::calendar::date_from_epoch_day(self.next_indexation_epoch_day)
    }
}
