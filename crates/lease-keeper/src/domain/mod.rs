//! Plain data carried between the repositories, the lifecycle services and the observers.

pub mod housing;
pub mod lease;
pub mod situation;
pub mod tenant;

pub use housing::{Address, Housing, HousingId};
pub use lease::{Key, KeyId, Lease, LeaseId, MAX_RENT_DUE_DAY, MIN_RENT_DUE_DAY};
pub use situation::{HousingSituation, TenantSituation, UpcomingIndexation};
pub use tenant::{Tenant, TenantId, TenantStatus};
