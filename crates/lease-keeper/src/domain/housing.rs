use serde::{Deserialize, Serialize};
use std::fmt;

/// Local identifier of a housing unit. `0` marks a unit that has not been persisted yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HousingId(pub i64);

impl HousingId {
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for HousingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Postal address of a housing unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
}

impl Address {
    pub fn one_line(&self) -> String {
        let street = [self.number.trim(), self.street.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        let locality = [self.zip_code.trim(), self.city.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        [street, locality, self.country.trim().to_string()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A rentable unit. Amounts are integer minor-currency units (cents).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Housing {
    #[serde(default)]
    pub id: HousingId,
    #[serde(default)]
    pub remote_id: Option<String>,
    pub address: Address,
    pub rent_cents: i64,
    pub charges_cents: i64,
    pub deposit_cents: i64,
}

impl Housing {
    /// A unit whose rent, charges and deposit are all zero has not been configured yet.
    pub fn is_unconfigured(&self) -> bool {
        self.rent_cents == 0 && self.charges_cents == 0 && self.deposit_cents == 0
    }

    pub fn monthly_total_cents(&self) -> i64 {
        self.rent_cents.saturating_add(self.charges_cents)
    }
}
