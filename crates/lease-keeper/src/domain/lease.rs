use serde::{Deserialize, Serialize};
use std::fmt;

use super::housing::HousingId;
use super::tenant::TenantId;

/// Rent is due on a day that exists in every month.
pub const MIN_RENT_DUE_DAY: u8 = 1;
pub const MAX_RENT_DUE_DAY: u8 = 28;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(pub i64);

impl LeaseId {
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub i64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rental contract binding one tenant to one housing unit.
///
/// Dates are epoch days. A lease without an end date is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    #[serde(default)]
    pub id: LeaseId,
    #[serde(default)]
    pub remote_id: Option<String>,
    pub housing_id: HousingId,
    pub tenant_id: TenantId,
    pub start_date_epoch_day: i64,
    #[serde(default)]
    pub end_date_epoch_day: Option<i64>,
    pub rent_cents: i64,
    pub charges_cents: i64,
    pub deposit_cents: i64,
    pub rent_due_day_of_month: u8,
    #[serde(default)]
    pub index_anniversary_epoch_day: Option<i64>,
}

impl Lease {
    pub fn is_active(&self) -> bool {
        self.end_date_epoch_day.is_none()
    }

    /// Day the yearly rent review is aligned on.
    pub fn indexation_anchor_epoch_day(&self) -> i64 {
        self.index_anniversary_epoch_day
            .unwrap_or(self.start_date_epoch_day)
    }
}

/// A physical key handed over with a lease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(default)]
    pub id: KeyId,
    #[serde(default)]
    pub lease_id: LeaseId,
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub handed_over_epoch_day: Option<i64>,
}
