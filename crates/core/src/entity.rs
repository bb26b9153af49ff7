//! Entity trait: identity + continuity across state changes.

use crate::id::RecordId;
use crate::validation::FieldSelection;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: RecordId;

    /// Human-facing resource name, singular (e.g. `Order`).
    const RESOURCE: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity that storage can own: it takes an assigned id and can be
/// updated field by field.
pub trait Record: Entity + Clone + Send + Sync + 'static {
    fn assign_id(&mut self, id: Self::Id);

    /// Copy the selected fields of `source` onto `self`.
    ///
    /// The id is never copied. Names outside the resource's field set are
    /// ignored; validation rejects them before an update gets this far.
    fn patch(&mut self, source: &Self, selection: &FieldSelection);
}
