//! Authorization engine: one policy table keyed by (resource, role, action).
//!
//! Every decision is a pure function of the principal and the record in
//! question. Callers never compare roles or owners inline; they ask
//! [`decide`] (or a resource-specific wrapper) and act on the
//! [`AuthDecision`].

use serde::Serialize;
use thiserror::Error;

use storefront_core::{DomainError, Entity, UserId};

use crate::principal::Principal;
use crate::roles::Role;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Order,
    Product,
    User,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Order => "Order",
            ResourceKind::Product => "Product",
            ResourceKind::User => "User",
        }
    }
}

/// What the policy table requires for one (resource, role, action) cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rule {
    Allow,
    Deny,
    /// The record must belong to the principal.
    Owned,
    /// The record must belong to the principal or be a customer account.
    OwnedOrCustomer,
    /// The record must be a customer account.
    CustomerAccount,
}

/// The policy table.
pub fn rule_for(kind: ResourceKind, role: Role, action: Action) -> Rule {
    use Action::*;
    use ResourceKind as K;

    match (kind, role, action) {
        (K::Order, Role::Customer, _) => Rule::Owned,
        (K::Order, Role::Employee | Role::Admin, _) => Rule::Allow,

        (K::Product, _, Read) => Rule::Allow,
        (K::Product, Role::Admin, _) => Rule::Allow,
        (K::Product, Role::Customer | Role::Employee, _) => Rule::Deny,

        (K::User, Role::Admin, _) => Rule::Allow,
        (K::User, _, Create) => Rule::CustomerAccount,
        (K::User, Role::Customer, Read | Update) => Rule::Owned,
        (K::User, Role::Customer, Delete) => Rule::Deny,
        (K::User, Role::Employee, Read | Update | Delete) => Rule::OwnedOrCustomer,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guarded records
// ─────────────────────────────────────────────────────────────────────────────

/// A record the policy table can reason about.
pub trait Guarded: Entity {
    const KIND: ResourceKind;

    /// The user that owns this record, if the resource has owners.
    fn owner_id(&self) -> Option<UserId>;

    /// For user accounts, the account's role.
    fn account_role(&self) -> Option<Role> {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden(reason) => DomainError::forbidden(reason),
        }
    }
}

/// Outcome of a single policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthDecision {
    pub allowed: bool,
    pub denial_reason: Option<String>,
}

impl AuthDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            denial_reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            denial_reason: Some(reason.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Both decisions must allow; the first denial wins.
    pub fn and(self, other: AuthDecision) -> AuthDecision {
        if self.allowed { other } else { self }
    }

    pub fn into_result(self) -> Result<(), AuthzError> {
        if self.allowed {
            return Ok(());
        }
        Err(AuthzError::Forbidden(
            self.denial_reason
                .unwrap_or_else(|| "not enough privileges".to_string()),
        ))
    }
}

pub const SELF_DELETE_REASON: &str =
    "not enough privileges to delete this User: users cannot delete their own account";

pub const USER_ROLE_CREATE_REASON: &str =
    "not enough privileges to create Users with the 'employee' or 'admin' roles";

/// Human-readable reason for a denied (resource, action).
pub fn denial_reason(kind: ResourceKind, action: Action) -> String {
    match (kind, action) {
        (ResourceKind::Product, Action::Create | Action::Update | Action::Delete) => {
            format!("not enough privileges to {} a Product", action.as_str())
        }
        (ResourceKind::User, Action::Create) => USER_ROLE_CREATE_REASON.to_string(),
        _ => format!(
            "not enough privileges to {} this {}",
            action.as_str(),
            kind.as_str()
        ),
    }
}

/// Decide whether `principal` may perform `action` on `record`.
///
/// For creates `record` is the candidate; otherwise it is the stored record.
pub fn decide<R: Guarded>(principal: &Principal, action: Action, record: &R) -> AuthDecision {
    let owned = record.owner_id() == Some(principal.user_id);

    if R::KIND == ResourceKind::User && action == Action::Delete && owned {
        return AuthDecision::deny(SELF_DELETE_REASON);
    }

    let customer_account = record.account_role() == Some(Role::Customer);
    let allowed = match rule_for(R::KIND, principal.role, action) {
        Rule::Allow => true,
        Rule::Deny => false,
        Rule::Owned => owned,
        Rule::OwnedOrCustomer => owned || customer_account,
        Rule::CustomerAccount => customer_account,
    };

    if allowed {
        AuthDecision::allow()
    } else {
        AuthDecision::deny(denial_reason(R::KIND, action))
    }
}

/// [`decide`], as a `Result`.
pub fn authorize<R: Guarded>(principal: &Principal, action: Action, record: &R) -> Result<(), AuthzError> {
    decide(principal, action, record).into_result()
}

/// Updates must be allowed on the stored record and on the record as it will
/// be written.
pub fn can_update<R: Guarded>(principal: &Principal, stored: &R, candidate: &R) -> AuthDecision {
    decide(principal, Action::Update, stored).and(decide(principal, Action::Update, candidate))
}

/// Listing filter: the readable subsequence of `records`, order preserved.
pub fn filter_readable<R: Guarded + Clone>(principal: &Principal, records: &[R]) -> Vec<R> {
    records
        .iter()
        .filter(|r| decide(principal, Action::Read, *r).is_allowed())
        .cloned()
        .collect()
}

/// Nobody may write a role above their own.
pub fn can_assign_role(principal: &Principal, role: Role) -> AuthDecision {
    if principal.role.satisfies(role) {
        AuthDecision::allow()
    } else {
        AuthDecision::deny(format!(
            "not enough privileges to assign the '{role}' role"
        ))
    }
}
