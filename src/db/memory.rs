use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::models::Record;
use super::{DocumentCollection, StoreError};

/// Collection kept in a `Vec`, used by the test suites.
pub struct MemoryCollection<T> {
    records: Mutex<Vec<T>>,
    fail: bool,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: false,
        }
    }
}

impl<T> MemoryCollection<T> {
    /// Every operation fails as if the store never answered.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Timeout(Duration::from_secs(10)));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> DocumentCollection<T> for MemoryCollection<T> {
    async fn insert_one(&self, record: &T) -> Result<(), StoreError> {
        self.check()?;
        self.records
            .lock()
            .expect("memory collection poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn find_newest_first(&self) -> Result<Vec<T>, StoreError> {
        self.check()?;
        // Reverse insertion order first so equal timestamps keep the later
        // insert ahead, as ObjectId ordering does in mongo.
        let mut records: Vec<T> = self
            .records
            .lock()
            .expect("memory collection poisoned")
            .iter()
            .rev()
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }
}
