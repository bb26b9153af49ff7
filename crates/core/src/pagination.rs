//! Seek-based pagination: fetch windows and range descriptors.
//!
//! Listings are bounded by a cursor (a record id) and a direction rather than
//! an offset. The same [`PageSeekOptions`] drive both the repository fetch and
//! the repository count, so the total reported in a range descriptor means
//! "records on this side of the cursor".
//!
//! The count and the fetch are two separate repository calls. Under
//! concurrent writes the reported total can be stale relative to the fetched
//! window; range metadata is informational and cursors, not totals, drive
//! iteration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Entity;
use crate::error::DomainError;
use crate::id::RecordId;

pub const BEFORE_ID_PARAM: &str = "before_id";
pub const AFTER_ID_PARAM: &str = "after_id";
pub const LIMIT_PARAM: &str = "limit";

/// Direction to move away from the cursor.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekDirection {
    /// Records with ids strictly below the cursor.
    Before,
    /// Records with ids strictly above the cursor.
    After,
    /// No cursor: start from the lowest id.
    #[default]
    None,
}

/// A bounded listing window. Built per request, never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSeekOptions {
    pub limit: u32,
    pub start_id: u64,
    pub direction: SeekDirection,
}

impl PageSeekOptions {
    /// First page of at most `limit` records.
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit,
            start_id: 0,
            direction: SeekDirection::None,
        }
    }

    /// Whether a record id lies on the requested side of the cursor.
    ///
    /// `limit` is not considered; counts use this alone.
    pub fn admits(&self, id: u64) -> bool {
        match self.direction {
            SeekDirection::Before => id < self.start_id,
            SeekDirection::After => id > self.start_id,
            SeekDirection::None => true,
        }
    }
}

/// Raw pagination query parameters, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeekParams {
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("only one of after_id and before_id query parameters can be set")]
    ConflictingCursors,

    #[error("{param} must be a non-negative integer, got '{value}'")]
    InvalidCursor { param: &'static str, value: String },

    #[error("limit must be an integer, got '{0}'")]
    InvalidLimit(String),

    #[error("limit must be greater than 0")]
    LimitTooSmall,

    #[error("limit must be less than or equal to {max}")]
    LimitTooLarge { max: u32 },
}

impl From<PaginationError> for DomainError {
    fn from(err: PaginationError) -> Self {
        DomainError::bad_request(err.to_string())
    }
}

/// Pagination policy for one resource listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeekPaginator {
    resource: &'static str,
    max_limit: u32,
}

impl SeekPaginator {
    /// `resource` is the plural name used in range descriptors (e.g. `orders`).
    pub const fn new(resource: &'static str, max_limit: u32) -> Self {
        Self {
            resource,
            max_limit,
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    pub fn compute_window(&self, params: &SeekParams) -> Result<PageSeekOptions, PaginationError> {
        compute_window(params, self.max_limit)
    }

    pub fn render_range<E: Entity>(&self, total_count: u64, window: &[E]) -> String {
        render_range(self.resource, total_count, window)
    }
}

/// Compute the fetch window from raw query parameters.
///
/// At most one cursor may be set. `limit` defaults to `max_limit` and, when
/// given, must satisfy `1 <= limit <= max_limit`.
pub fn compute_window(params: &SeekParams, max_limit: u32) -> Result<PageSeekOptions, PaginationError> {
    let (direction, start_id) = match (&params.after_id, &params.before_id) {
        (Some(_), Some(_)) => return Err(PaginationError::ConflictingCursors),
        (Some(after), None) => (SeekDirection::After, parse_cursor(AFTER_ID_PARAM, after)?),
        (None, Some(before)) => (SeekDirection::Before, parse_cursor(BEFORE_ID_PARAM, before)?),
        (None, None) => (SeekDirection::None, 0),
    };

    let limit = match &params.limit {
        None => max_limit,
        Some(raw) => parse_limit(raw, max_limit)?,
    };

    Ok(PageSeekOptions {
        limit,
        start_id,
        direction,
    })
}

fn parse_cursor(param: &'static str, raw: &str) -> Result<u64, PaginationError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PaginationError::InvalidCursor {
            param,
            value: raw.to_string(),
        })
}

fn parse_limit(raw: &str, max_limit: u32) -> Result<u32, PaginationError> {
    let limit = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| PaginationError::InvalidLimit(raw.to_string()))?;
    if limit < 1 {
        return Err(PaginationError::LimitTooSmall);
    }
    if limit > i64::from(max_limit) {
        return Err(PaginationError::LimitTooLarge { max: max_limit });
    }
    Ok(limit as u32)
}

/// Render `"<resource>=<firstID>-<lastID>/<totalCount>"`.
///
/// An empty window renders as `0-0`.
pub fn render_range<E: Entity>(resource_name: &str, total_count: u64, window: &[E]) -> String {
    let first = window.first().map_or(0, |e| e.id().get());
    let last = window.last().map_or(0, |e| e.id().get());
    format!("{resource_name}={first}-{last}/{total_count}")
}
