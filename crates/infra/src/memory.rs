use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use storefront_auth::User;
use storefront_core::{FieldSelection, PageSeekOptions, Record, RecordId, SeekDirection};

use crate::repository::{Repository, RepositoryError, UserDirectory};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
}

/// In-memory repository for tests/dev.
///
/// Ids start at 1 and are never reused, even after a delete.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    inner: RwLock<Table<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table<T>>, RepositoryError> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::Storage("repository lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table<T>>, RepositoryError> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::Storage("repository lock poisoned".to_string()))
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> InMemoryRepository<T> {
    fn not_found(id: u64) -> RepositoryError {
        RepositoryError::NotFound {
            resource: T::RESOURCE,
            id,
        }
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn count(&self, seek: &PageSeekOptions) -> Result<u64, RepositoryError> {
        let table = self.read()?;
        Ok(table.rows.keys().filter(|id| seek.admits(**id)).count() as u64)
    }

    fn fetch(&self, seek: &PageSeekOptions) -> Result<Vec<T>, RepositoryError> {
        let table = self.read()?;
        let limit = seek.limit as usize;

        let window = match seek.direction {
            SeekDirection::None => table.rows.values().take(limit).cloned().collect(),
            SeekDirection::After => table
                .rows
                .range(seek.start_id.saturating_add(1)..)
                .filter(|(id, _)| **id > seek.start_id)
                .take(limit)
                .map(|(_, row)| row.clone())
                .collect(),
            SeekDirection::Before => {
                // The rows closest to the cursor, handed back in ascending order.
                let mut rows: Vec<T> = table
                    .rows
                    .range(..seek.start_id)
                    .rev()
                    .take(limit)
                    .map(|(_, row)| row.clone())
                    .collect();
                rows.reverse();
                rows
            }
        };
        Ok(window)
    }

    fn get_by_id(&self, id: T::Id) -> Result<T, RepositoryError> {
        let table = self.read()?;
        table
            .rows
            .get(&id.get())
            .cloned()
            .ok_or_else(|| Self::not_found(id.get()))
    }

    fn exists(&self, id: T::Id) -> Result<bool, RepositoryError> {
        Ok(self.read()?.rows.contains_key(&id.get()))
    }

    fn create(&self, mut record: T) -> Result<T, RepositoryError> {
        let mut table = self.write()?;
        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage("id sequence exhausted".to_string()))?;
        table.last_id = id;
        record.assign_id(T::Id::from_raw(id));
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, record: &T, fields: &FieldSelection) -> Result<T, RepositoryError> {
        let id = record.id().get();
        let mut table = self.write()?;
        let stored = table.rows.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        stored.patch(record, fields);
        Ok(stored.clone())
    }

    fn delete(&self, id: T::Id) -> Result<(), RepositoryError> {
        let mut table = self.write()?;
        table
            .rows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id.get()))
    }
}

impl UserDirectory for InMemoryRepository<User> {
    fn find_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError> {
        let table = self.read()?;
        Ok(table.rows.values().find(|u| u.name == name).cloned())
    }
}
