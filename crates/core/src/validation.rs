//! Per-field validator registry shared by full and partial validation.
//!
//! Each resource type declares one table mapping a field name (as it appears
//! on the wire) to a single-field check. Full validation runs every entry in
//! table order; partial validation runs exactly the selected entries. Both
//! paths go through the same checks, so validating the complete field list
//! partially is the same as validating fully.

use thiserror::Error;

use crate::error::DomainError;

/// Single-field check. Returns the human-readable failure message.
pub type FieldCheck<T> = fn(&T) -> Result<(), String>;

/// One registry entry.
pub struct Field<T: 'static> {
    name: &'static str,
    check: FieldCheck<T>,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, check: FieldCheck<T>) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field name is invalid: {field}")]
    UnknownField {
        resource: &'static str,
        field: String,
    },

    #[error("{message}")]
    Invalid {
        resource: &'static str,
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub fn resource(&self) -> &'static str {
        match self {
            ValidationError::UnknownField { resource, .. }
            | ValidationError::Invalid { resource, .. } => resource,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::UnknownField { .. } => DomainError::bad_request(err.to_string()),
            ValidationError::Invalid { resource, .. } => {
                DomainError::validation(format!("{resource}: {err}"))
            }
        }
    }
}

/// Static table of field validators for one resource type.
pub struct FieldRegistry<T: 'static> {
    resource: &'static str,
    fields: &'static [Field<T>],
}

impl<T> FieldRegistry<T> {
    pub const fn new(resource: &'static str, fields: &'static [Field<T>]) -> Self {
        Self { resource, fields }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Recognized field names, in validation order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(Field::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn run(&self, field: &Field<T>, candidate: &T) -> Result<(), ValidationError> {
        (field.check)(candidate).map_err(|message| ValidationError::Invalid {
            resource: self.resource,
            field: field.name,
            message,
        })
    }

    /// Validate a single named field.
    pub fn check(&self, candidate: &T, name: &str) -> Result<(), ValidationError> {
        let field = self.lookup(name).ok_or_else(|| ValidationError::UnknownField {
            resource: self.resource,
            field: name.to_string(),
        })?;
        self.run(field, candidate)
    }

    /// Validate every recognized field, stopping at the first failure.
    pub fn validate_all(&self, candidate: &T) -> Result<(), ValidationError> {
        self.fields.iter().try_for_each(|f| self.run(f, candidate))
    }

    /// Validate exactly the selected fields. An empty selection always succeeds.
    pub fn validate_partial<S: AsRef<str>>(
        &self,
        candidate: &T,
        selected: &[S],
    ) -> Result<(), ValidationError> {
        selected
            .iter()
            .try_for_each(|name| self.check(candidate, name.as_ref()))
    }

    pub fn validate_selection(
        &self,
        candidate: &T,
        selection: &FieldSelection,
    ) -> Result<(), ValidationError> {
        match selection {
            FieldSelection::All => self.validate_all(candidate),
            FieldSelection::Only(fields) => self.validate_partial(candidate, fields),
        }
    }
}

/// Types that carry a field validator registry.
pub trait Validate: Sized + 'static {
    const FIELDS: FieldRegistry<Self>;

    fn validate(&self) -> Result<(), ValidationError> {
        Self::FIELDS.validate_all(self)
    }

    fn validate_partial<S: AsRef<str>>(&self, selected: &[S]) -> Result<(), ValidationError> {
        Self::FIELDS.validate_partial(self, selected)
    }

    fn validate_selection(&self, selection: &FieldSelection) -> Result<(), ValidationError> {
        Self::FIELDS.validate_selection(self, selection)
    }
}

/// Which fields an update writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    /// Full update: every field is written.
    #[default]
    All,
    /// Partial update: only the named fields are written.
    Only(Vec<String>),
}

impl FieldSelection {
    /// Build a selection from the raw `fields` query parameter.
    ///
    /// Absent parameter means a full update. Names are comma separated;
    /// surrounding whitespace and empty segments are dropped, so `fields=`
    /// selects nothing.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None => FieldSelection::All,
            Some(raw) => FieldSelection::Only(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSelection::Only(fields.into_iter().map(Into::into).collect())
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, FieldSelection::Only(_))
    }

    /// Whether the update writes `name`.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            FieldSelection::All => true,
            FieldSelection::Only(fields) => fields.iter().any(|f| f == name),
        }
    }
}
