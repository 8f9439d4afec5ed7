use crate::calendar;
use crate::domain::{HousingId, LeaseId, TenantId, MAX_RENT_DUE_DAY, MIN_RENT_DUE_DAY};

/// Rule violations raised before any mutation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("housing is required")]
    HousingRequired,
    #[error("tenant is required")]
    TenantRequired,
    #[error("start date is required")]
    StartDateRequired,
    #[error("start date must fall between years 1 and 9999 (found day {start_epoch_day})")]
    StartDateOutOfRange { start_epoch_day: i64 },
    #[error("due day must be between 1 and 28 (found {found})")]
    RentDueDayOutOfRange { found: i32 },
    #[error("selected housing does not exist")]
    HousingNotFound { housing_id: HousingId },
    #[error("selected tenant does not exist")]
    TenantNotFound { tenant_id: TenantId },
    #[error("lease is required")]
    LeaseRequired,
    #[error("end date must not precede the epoch (found day {end_epoch_day})")]
    EndDateBeforeEpoch { end_epoch_day: i64 },
    #[error("deletion impossible: an active lease exists for this housing")]
    HousingHasActiveLease { housing_id: HousingId },
    #[error("first name is required")]
    FirstNameRequired,
    #[error("last name is required")]
    LastNameRequired,
    #[error("key type is required")]
    KeyKindRequired,
}

pub(crate) fn require_housing(id: Option<HousingId>) -> Result<HousingId, ValidationError> {
    id.filter(|id| id.is_assigned())
        .ok_or(ValidationError::HousingRequired)
}

pub(crate) fn require_tenant(id: Option<TenantId>) -> Result<TenantId, ValidationError> {
    id.filter(|id| id.is_assigned())
        .ok_or(ValidationError::TenantRequired)
}

pub(crate) fn require_lease(id: LeaseId) -> Result<LeaseId, ValidationError> {
    if id.is_assigned() {
        Ok(id)
    } else {
        Err(ValidationError::LeaseRequired)
    }
}

pub(crate) fn start_date(epoch_day: Option<i64>) -> Result<i64, ValidationError> {
    let start_epoch_day = epoch_day.ok_or(ValidationError::StartDateRequired)?;
    if calendar::is_supported_epoch_day(start_epoch_day) {
        Ok(start_epoch_day)
    } else {
        Err(ValidationError::StartDateOutOfRange { start_epoch_day })
    }
}

pub(crate) fn rent_due_day(day: i32) -> Result<u8, ValidationError> {
    u8::try_from(day)
        .ok()
        .filter(|day| (MIN_RENT_DUE_DAY..=MAX_RENT_DUE_DAY).contains(day))
        .ok_or(ValidationError::RentDueDayOutOfRange { found: day })
}

pub(crate) fn not_blank(value: &str, missing: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(missing)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rent_due_day_accepts_the_whole_range() {
        assert_eq!(rent_due_day(1), Ok(1));
        assert_eq!(rent_due_day(28), Ok(28));
    }

    #[test]
    fn rent_due_day_rejects_days_missing_from_some_months() {
        for day in [0, 29, 31, -3, 300] {
            assert_eq!(
                rent_due_day(day),
                Err(ValidationError::RentDueDayOutOfRange { found: day })
            );
        }
    }

    #[test]
    fn unassigned_ids_count_as_missing() {
        assert_eq!(
            require_housing(Some(HousingId(0))),
            Err(ValidationError::HousingRequired)
        );
        assert_eq!(require_tenant(None), Err(ValidationError::TenantRequired));
        assert_eq!(
            require_lease(LeaseId(-1)),
            Err(ValidationError::LeaseRequired)
        );
    }

    #[test]
    fn whitespace_is_blank() {
        assert_eq!(
            not_blank("  \t", ValidationError::FirstNameRequired),
            Err(ValidationError::FirstNameRequired)
        );
        assert_eq!(
            not_blank(" Ada ", ValidationError::FirstNameRequired),
            Ok(())
        );
    }
}
