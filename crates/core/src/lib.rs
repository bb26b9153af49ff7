//! `storefront-core`: shared building blocks for the storefront policy layer.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage):
//! identifiers, the domain error taxonomy, the per-field validator registry
//! and seek-based pagination.

pub mod entity;
pub mod error;
pub mod id;
pub mod pagination;
pub mod validation;

pub use entity::{Entity, Record};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{ItemId, OrderId, ProductId, RecordId, UserId};
pub use pagination::{PageSeekOptions, PaginationError, SeekDirection, SeekPaginator, SeekParams};
pub use validation::{Field, FieldCheck, FieldRegistry, FieldSelection, Validate, ValidationError};
