//! `storefront-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns
//! claims into a [`Principal`] and answers "may this principal do that to
//! this record".

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{
    Action, AuthDecision, AuthzError, Guarded, ResourceKind, Rule, authorize, can_assign_role, can_update, decide,
    filter_readable,
};
pub use claims::{Claims, Hs256JwtValidator, JwtValidator, TokenValidationError, validate_claims};
pub use principal::Principal;
pub use roles::{InvalidRole, Role, satisfies};
pub use user::{User, can_create_user, can_delete_user, can_read_user, can_update_user, password_policy_message};
