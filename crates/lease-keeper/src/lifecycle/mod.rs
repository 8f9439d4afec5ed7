//! Use-cases that validate intent before handing mutations to the repositories.
//!
//! Every operation validates first and delegates second: a `ValidationError` is always raised
//! before the repository sees a write, and repository failures are returned unchanged. Nothing
//! here retries.

pub mod housing;
pub mod lease;
pub mod tenant;
pub mod validation;

pub use housing::HousingService;
pub use lease::{LeaseDraft, LeaseService};
pub use tenant::TenantService;
pub use validation::ValidationError;

use crate::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}
