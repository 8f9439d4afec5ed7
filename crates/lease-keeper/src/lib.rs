//! Lease lifecycle and rent indexation engine for rental property management.
//!
//! Housing units, tenants, leases and keys live behind the repository contracts in
//! [`repository`]. The services in [`lifecycle`] enforce the business rules before delegating
//! writes, while [`situation`] and [`indexation`] derive live views from the repositories'
//! push streams.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod indexation;
pub mod keeper;
pub mod lifecycle;
pub mod live;
pub mod repository;
pub mod router;
pub mod situation;
pub mod store;
pub mod telemetry;

pub use keeper::LeaseKeeper;
pub use router::lease_keeper_router;
