use serde::{Deserialize, Serialize};

use storefront_core::UserId;

use crate::claims::Claims;
use crate::roles::{InvalidRole, Role};

/// The authenticated caller of one request.
///
/// Built once from validated claims and never mutated; every authorization
/// decision takes it by reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Resolve a principal from token claims, rejecting unknown roles.
    pub fn from_claims(claims: &Claims) -> Result<Self, InvalidRole> {
        Ok(Self {
            user_id: claims.sub,
            role: claims.role.parse()?,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(role: &str) -> Claims {
        let now = Utc::now();
        Claims {
            sub: UserId::new(12),
            name: "jo".to_string(),
            role: role.to_string(),
            issued_at: now,
            expires_at: now + Duration::minutes(5),
        }
    }

    #[test]
    fn resolves_known_role() {
        let p = Principal::from_claims(&claims("employee")).unwrap();
        assert_eq!(p, Principal::new(UserId::new(12), Role::Employee));
        assert!(p.is(UserId::new(12)));
        assert!(!p.is_admin());
    }

    #[test]
    fn rejects_unknown_role_as_bad_request() {
        let err = Principal::from_claims(&claims("owner")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "role is invalid, expected one of: customer, employee, admin got owner"
        );
        let domain: storefront_core::DomainError = err.into();
        assert_eq!(domain.kind(), storefront_core::ErrorKind::BadRequest);
    }
}
