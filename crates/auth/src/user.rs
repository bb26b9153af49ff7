//! User accounts: model, per-field validators and account policy.
//!
//! Passwords arrive as plaintext candidates and leave this module only as a
//! hash produced by the caller's hasher. The hash is never serialized.

use serde::{Deserialize, Serialize};

use storefront_core::{Entity, Field, FieldRegistry, FieldSelection, Record, UserId, Validate};

use crate::authorize::{self, Action, AuthDecision, Guarded, ResourceKind};
use crate::principal::Principal;
use crate::roles::{InvalidRole, Role};

pub const NAME_MAX_CHARS: usize = 64;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 72;

// ─────────────────────────────────────────────────────────────────────────────
// Model
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,

    #[serde(default)]
    pub name: String,

    /// Plaintext candidate from a create/update request.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(skip)]
    pub password_hash: String,

    /// Absent only on requests; stored accounts always carry a role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::default(),
            name: name.into(),
            password: Some(password.into()),
            password_hash: String::new(),
            role: Some(role),
        }
    }

    fn check_name(&self) -> Result<(), String> {
        let len = self.name.chars().count();
        if len == 0 {
            return Err("name must be at least 1 character".to_string());
        }
        if len > NAME_MAX_CHARS {
            return Err(format!("name must be at most {NAME_MAX_CHARS} characters"));
        }
        Ok(())
    }

    fn check_password(&self) -> Result<(), String> {
        match &self.password {
            None => Err("password must be provided".to_string()),
            Some(p) if meets_password_policy(p) => Ok(()),
            Some(_) => Err(password_policy_message()),
        }
    }

    // Unknown role names are rejected while decoding; only absence is left.
    fn check_role(&self) -> Result<(), String> {
        match self.role {
            Some(_) => Ok(()),
            None => Err(InvalidRole {
                expected: Role::valid_roles_message(),
                got: "nothing".to_string(),
            }
            .to_string()),
        }
    }
}

impl Validate for User {
    const FIELDS: FieldRegistry<Self> = FieldRegistry::new(
        "User",
        &[
            Field::new("name", User::check_name),
            Field::new("password", User::check_password),
            Field::new("role", User::check_role),
        ],
    );
}

impl Entity for User {
    type Id = UserId;
    const RESOURCE: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }
}

impl Record for User {
    fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }

    fn patch(&mut self, source: &Self, selection: &FieldSelection) {
        if selection.includes("name") {
            self.name.clone_from(&source.name);
        }
        if selection.includes("password") {
            self.password.clone_from(&source.password);
            self.password_hash.clone_from(&source.password_hash);
        }
        if selection.includes("role") && source.role.is_some() {
            self.role = source.role;
        }
    }
}

impl Guarded for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn owner_id(&self) -> Option<UserId> {
        Some(self.id)
    }

    fn account_role(&self) -> Option<Role> {
        self.role
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Password policy
// ─────────────────────────────────────────────────────────────────────────────

pub fn password_policy_message() -> String {
    format!(
        "password must be {PASSWORD_MIN_CHARS}-{PASSWORD_MAX_CHARS} characters long and contain \
         at least one lowercase letter, one uppercase letter, one digit and one symbol"
    )
}

pub fn meets_password_policy(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(char::is_uppercase)
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

// ─────────────────────────────────────────────────────────────────────────────
// Policy entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Non-admins may only create customer accounts.
pub fn can_create_user(principal: &Principal, candidate: &User) -> AuthDecision {
    authorize::decide(principal, Action::Create, candidate)
}

pub fn can_read_user(principal: &Principal, target: &User) -> AuthDecision {
    authorize::decide(principal, Action::Read, target)
}

/// `candidate` is the record as it will be stored after the update.
pub fn can_update_user(
    principal: &Principal,
    stored: &User,
    candidate: &User,
    selection: &FieldSelection,
) -> AuthDecision {
    let decision = authorize::can_update(principal, stored, candidate);
    match candidate.role {
        Some(role) if selection.includes("role") => {
            decision.and(authorize::can_assign_role(principal, role))
        }
        _ => decision,
    }
}

/// `target` must be freshly read from storage: employees may only delete
/// accounts that are currently customers.
pub fn can_delete_user(principal: &Principal, target: &User) -> AuthDecision {
    authorize::decide(principal, Action::Delete, target)
}
