use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::DomainError;

/// Principal role, ordered by increasing privilege.
///
/// Privilege is a strict total order (`Customer < Employee < Admin`), so
/// "does this role meet the requirement" is a single comparison.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Employee,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Employee, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    /// Whether a principal holding `self` meets `required`.
    ///
    /// `Admin` is met only by admins, `Employee` by employees and admins, and
    /// `Customer` (the baseline) by every role.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    /// Whether `raw` names one of the known roles.
    pub fn is_valid(raw: &str) -> bool {
        raw.parse::<Role>().is_ok()
    }

    /// `"customer, employee, admin"`.
    pub fn valid_roles_message() -> String {
        Role::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("role is invalid, expected one of: {expected} got {got}")]
pub struct InvalidRole {
    pub expected: String,
    pub got: String,
}

impl From<InvalidRole> for DomainError {
    fn from(err: InvalidRole) -> Self {
        DomainError::bad_request(err.to_string())
    }
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| InvalidRole {
                expected: Role::valid_roles_message(),
                got: s.to_string(),
            })
    }
}

/// Free-function form of [`Role::satisfies`].
pub fn satisfies(principal_role: Role, required: Role) -> bool {
    principal_role.satisfies(required)
}
