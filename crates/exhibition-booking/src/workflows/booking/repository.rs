use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::domain::{Booking, BookingId};
use super::store::{BookingStore, StoreError};

/// The in-memory booking collection and its mirror in a [`BookingStore`].
///
/// Mutations run one at a time against a working copy. The copy is written to
/// the store in full and only then becomes visible, so a failed save leaves
/// both memory and storage as they were.
pub struct BookingRepository<S> {
    store: S,
    bookings: Mutex<Vec<Booking>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("booking {0} not found")]
    NotFound(BookingId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("booking collection lock poisoned")]
    Poisoned,
}

impl<S: BookingStore> BookingRepository<S> {
    /// Read the store once. An absent store yields an empty collection.
    pub fn open(store: S) -> Result<Self, RepositoryError> {
        let bookings = store.load()?.unwrap_or_default();
        debug!(count = bookings.len(), "booking store loaded");
        Ok(Self {
            store,
            bookings: Mutex::new(bookings),
        })
    }

    /// Like [`open`](Self::open), but an absent store is populated with
    /// `seed` and written back immediately.
    pub fn open_with_seed(store: S, seed: Vec<Booking>) -> Result<Self, RepositoryError> {
        match store.load()? {
            Some(bookings) => {
                debug!(count = bookings.len(), "booking store loaded");
                Ok(Self {
                    store,
                    bookings: Mutex::new(bookings),
                })
            }
            None => {
                store.save(&seed)?;
                debug!(count = seed.len(), "booking store seeded");
                Ok(Self {
                    store,
                    bookings: Mutex::new(seed),
                })
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Booking>>, RepositoryError> {
        self.bookings.lock().map_err(|_| RepositoryError::Poisoned)
    }

    pub fn snapshot(&self) -> Result<Vec<Booking>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    pub fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.lock()?.iter().find(|booking| &booking.id == id).cloned())
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.is_empty())
    }

    /// Apply `change` to a copy of the collection and persist it wholesale.
    /// Nothing is stored when `change` or the save fails.
    pub fn mutate<T, E>(
        &self,
        change: impl FnOnce(&mut Vec<Booking>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepositoryError>,
    {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let outcome = change(&mut working)?;
        self.store
            .save(&working)
            .map_err(RepositoryError::from)?;
        debug!(count = working.len(), "booking store rewritten");
        *guard = working;
        Ok(outcome)
    }

    /// Swap in a whole new collection, e.g. the demo data.
    pub fn replace_all(&self, bookings: Vec<Booking>) -> Result<(), RepositoryError> {
        self.mutate(|current| {
            *current = bookings;
            Ok(())
        })
    }

    /// Empty the collection and drop it from the store.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        self.store.clear()?;
        guard.clear();
        debug!("booking store cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::booking::seed::demo_bookings;
    use crate::workflows::booking::store::MemoryStore;

    #[test]
    fn open_with_seed_writes_demo_data_once() {
        let store = MemoryStore::default();
        let repository =
            BookingRepository::open_with_seed(store.clone(), demo_bookings()).expect("opens");
        assert_eq!(repository.len().expect("len"), 5);
        assert_eq!(store.snapshot().map(|saved| saved.len()), Some(5));

        store.save(&demo_bookings()[..2]).expect("shrink store");
        let reopened =
            BookingRepository::open_with_seed(store.clone(), demo_bookings()).expect("reopens");
        assert_eq!(reopened.len().expect("len"), 2);
    }

    #[test]
    fn open_without_seed_starts_empty() {
        let repository = BookingRepository::open(MemoryStore::default()).expect("opens");
        assert!(repository.is_empty().expect("is_empty"));
    }

    #[test]
    fn failed_change_leaves_collection_untouched() {
        let store = MemoryStore::with_bookings(demo_bookings());
        let repository = BookingRepository::open(store.clone()).expect("opens");

        let outcome: Result<(), RepositoryError> = repository.mutate(|bookings| {
            bookings.clear();
            Err(RepositoryError::NotFound(BookingId("nope".to_string())))
        });

        assert!(matches!(outcome, Err(RepositoryError::NotFound(_))));
        assert_eq!(repository.len().expect("len"), 5);
        assert_eq!(store.snapshot().map(|saved| saved.len()), Some(5));
    }

    #[test]
    fn clear_empties_memory_and_store() {
        let store = MemoryStore::with_bookings(demo_bookings());
        let repository = BookingRepository::open(store.clone()).expect("opens");
        repository.clear().expect("clears");
        assert!(repository.is_empty().expect("is_empty"));
        assert!(store.snapshot().is_none());
    }
}
