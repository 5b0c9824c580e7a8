use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::domain::Booking;

/// Name the booking array is kept under in key-value storage.
pub const STORAGE_KEY: &str = "exhibitionBookings";

/// Flat key-value persistence for the whole booking collection. The
/// repository reads it once on open and rewrites it after every mutation.
pub trait BookingStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<Booking>>, StoreError>;
    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError>;
    /// Drop the stored collection entirely.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("booking store io failure at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("booking store holds malformed data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("booking store unavailable: {0}")]
    Unavailable(String),
}

impl<S: BookingStore + ?Sized> BookingStore for Arc<S> {
    fn load(&self) -> Result<Option<Vec<Booking>>, StoreError> {
        (**self).load()
    }

    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
        (**self).save(bookings)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// One JSON file holding the serialized array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }
}

impl BookingStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Booking>>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let bookings = serde_json::from_slice(&raw)?;
        Ok(Some(bookings))
    }

    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let payload = serde_json::to_vec_pretty(bookings)?;
        let staging = self.staging_path();
        let mut file = fs::File::create(&staging).map_err(|err| self.io_error(err))?;
        file.write_all(&payload)
            .and_then(|()| file.sync_all())
            .map_err(|err| self.io_error(err))?;
        // Rename is the only atomicity the store offers.
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Process-local store for tests and throwaway runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Vec<Booking>>>>,
}

impl MemoryStore {
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(bookings))),
        }
    }

    /// What a fresh repository would read back.
    pub fn snapshot(&self) -> Option<Vec<Booking>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Vec<Booking>>>, StoreError> {
        self.slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl BookingStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Booking>>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
        *self.lock()? = Some(bookings.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::booking::seed::demo_bookings;

    #[test]
    fn file_store_reports_absent_before_first_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("exhibitionBookings.json"));
        assert!(store.load().expect("load succeeds").is_none());
    }

    #[test]
    fn file_store_rewrites_whole_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("bookings.json"));
        let mut bookings = demo_bookings();

        store.save(&bookings).expect("first save");
        bookings.truncate(2);
        store.save(&bookings).expect("second save");

        let loaded = store.load().expect("load").expect("present");
        assert_eq!(loaded, bookings);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn file_store_uses_camel_case_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("bookings.json"));
        store.save(&demo_bookings()[..1]).expect("save");

        let raw = std::fs::read_to_string(store.path()).expect("read back");
        assert!(raw.contains("\"companyName\": \"TechCorp Solutions\""));
        assert!(raw.contains("\"preferredLocation\": \"main-hall\""));
        assert!(raw.contains("\"createdAt\": \"2024-01-15T10:30:00Z\""));
    }

    #[test]
    fn file_store_surfaces_malformed_payloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookings.json");
        std::fs::write(&path, b"{ not json").expect("write garbage");

        match JsonFileStore::new(path).load() {
            Err(StoreError::Malformed(_)) => {}
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn clear_removes_saved_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("bookings.json"));
        store.save(&demo_bookings()).expect("save");
        store.clear().expect("clear");
        store.clear().expect("clearing twice is fine");
        assert!(store.load().expect("load").is_none());

        let memory = MemoryStore::with_bookings(demo_bookings());
        memory.clear().expect("clear");
        assert!(memory.snapshot().is_none());
    }
}
