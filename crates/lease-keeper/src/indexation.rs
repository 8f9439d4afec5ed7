//! Yearly rent-review scheduling.
//!
//! Each active lease is reviewed on the anniversary of its anchor date (the indexation
//! anniversary when set, the start date otherwise). The scheduler lists, for every active lease,
//! the first anniversary on or after today and how many days remain until it.

use std::sync::Arc;

use futures::StreamExt;
use tracing::warn;

use crate::calendar;
use crate::domain::{Lease, UpcomingIndexation};
use crate::live::{terminate_on_error, Observation, StreamError};
use crate::repository::LeaseRepository;

/// First anniversary of `anchor_epoch_day` that falls on or after `today_epoch_day`.
///
/// An anchor that is not yet due is its own next date. Otherwise the anchor is moved forward by
/// the number of whole calendar years elapsed, plus one more year when that still lands before
/// today. Returns `None` when either day is outside the supported calendar range.
pub fn next_indexation_epoch_day(anchor_epoch_day: i64, today_epoch_day: i64) -> Option<i64> {
    let anchor = calendar::date_from_epoch_day(anchor_epoch_day)?;
    let today = calendar::date_from_epoch_day(today_epoch_day)?;
    if anchor >= today {
        return Some(anchor_epoch_day);
    }

    let years = calendar::whole_years_between(anchor, today);
    let mut candidate = calendar::add_years(anchor, years)?;
    if candidate < today {
        candidate = calendar::add_years(anchor, years.checked_add(1)?)?;
    }
    Some(calendar::epoch_day(candidate))
}

/// Upcoming reviews of the active leases in `leases`, soonest first.
///
/// Leases due on the same day keep their relative order from `leases`.
pub fn upcoming_indexations(leases: &[Lease], today_epoch_day: i64) -> Vec<UpcomingIndexation> {
    let mut upcoming: Vec<UpcomingIndexation> = leases
        .iter()
        .filter(|lease| lease.is_active())
        .filter_map(|lease| {
            let anchor = lease.indexation_anchor_epoch_day();
            let Some(next) = next_indexation_epoch_day(anchor, today_epoch_day) else {
                warn!(
                    lease_id = lease.id.0,
                    anchor_epoch_day = anchor,
                    "indexation anchor outside the supported calendar range"
                );
                return None;
            };
            Some(UpcomingIndexation {
                lease_id: lease.id,
                housing_id: lease.housing_id,
                tenant_id: lease.tenant_id,
                next_indexation_epoch_day: next,
                days_until: next - today_epoch_day,
            })
        })
        .collect();

    upcoming.sort_by_key(|indexation| indexation.days_until);
    upcoming
}

pub struct IndexationScheduler<L> {
    leases: Arc<L>,
}

impl<L> IndexationScheduler<L>
where
    L: LeaseRepository + 'static,
{
    pub fn new(leases: Arc<L>) -> Self {
        Self { leases }
    }

    /// Recomputes the schedule on every emission of the active-lease stream.
    ///
    /// An upstream failure is delivered as the last item; subscribe again to recover.
    pub fn observe_upcoming_indexations(
        &self,
        today_epoch_day: i64,
    ) -> Observation<Vec<UpcomingIndexation>> {
        terminate_on_error(self.leases.observe_active_leases())
            .map(move |item| match item {
                Ok(leases) => Ok(upcoming_indexations(&leases, today_epoch_day)),
                Err(source) => {
                    warn!(error = %source, "active lease stream failed");
                    Err(StreamError::from(source))
                }
            })
            .boxed()
    }
}
