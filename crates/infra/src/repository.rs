use std::sync::Arc;

use thiserror::Error;

use storefront_auth::User;
use storefront_core::{DomainError, FieldSelection, PageSeekOptions, Record};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{resource} not found (id: {id})")]
    NotFound { resource: &'static str, id: u64 },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => DomainError::not_found(err.to_string()),
            RepositoryError::Storage(_) => DomainError::internal(err.to_string()),
        }
    }
}

/// Storage for one resource type.
///
/// `count` and `fetch` take the same seek options; `count` ignores the limit
/// so it reports how many records lie on the requested side of the cursor.
pub trait Repository<T: Record>: Send + Sync {
    fn count(&self, seek: &PageSeekOptions) -> Result<u64, RepositoryError>;

    /// Up to `seek.limit` records, in ascending id order.
    fn fetch(&self, seek: &PageSeekOptions) -> Result<Vec<T>, RepositoryError>;

    fn get_by_id(&self, id: T::Id) -> Result<T, RepositoryError>;

    fn exists(&self, id: T::Id) -> Result<bool, RepositoryError>;

    /// Store a new record under a freshly assigned id and return it.
    fn create(&self, record: T) -> Result<T, RepositoryError>;

    /// Write the selected fields of `record` onto the stored record with the
    /// same id and return the result.
    fn update(&self, record: &T, fields: &FieldSelection) -> Result<T, RepositoryError>;

    fn delete(&self, id: T::Id) -> Result<(), RepositoryError>;
}

impl<T, R> Repository<T> for Arc<R>
where
    T: Record,
    R: Repository<T> + ?Sized,
{
    fn count(&self, seek: &PageSeekOptions) -> Result<u64, RepositoryError> {
        (**self).count(seek)
    }

    fn fetch(&self, seek: &PageSeekOptions) -> Result<Vec<T>, RepositoryError> {
        (**self).fetch(seek)
    }

    fn get_by_id(&self, id: T::Id) -> Result<T, RepositoryError> {
        (**self).get_by_id(id)
    }

    fn exists(&self, id: T::Id) -> Result<bool, RepositoryError> {
        (**self).exists(id)
    }

    fn create(&self, record: T) -> Result<T, RepositoryError> {
        (**self).create(record)
    }

    fn update(&self, record: &T, fields: &FieldSelection) -> Result<T, RepositoryError> {
        (**self).update(record, fields)
    }

    fn delete(&self, id: T::Id) -> Result<(), RepositoryError> {
        (**self).delete(id)
    }
}

/// User lookups beyond plain CRUD.
pub trait UserDirectory: Repository<User> {
    fn find_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError>;
}
