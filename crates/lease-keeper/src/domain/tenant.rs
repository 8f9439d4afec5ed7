use serde::{Deserialize, Serialize};
use std::fmt;

/// Local identifier of a tenant. `0` marks a tenant that has not been persisted yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub i64);

impl TenantId {
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    #[default]
    Active,
    Former,
    Prospect,
}

impl TenantStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Former => "former",
            Self::Prospect => "prospect",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default)]
    pub id: TenantId,
    #[serde(default)]
    pub remote_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: TenantStatus,
}

impl Tenant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
