//! Storage boundary for items and their scheduling state.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Item, SchedulingState};

/// Repository for item reads and scheduling writes.
///
/// Scheduling writes are compare-and-swap on `review_count`: when the stored
/// count differs from `expected_review_count` the write must fail with
/// [`Error::Conflict`] and leave the record untouched.
pub trait ItemRepository: Send + Sync {
    fn get_item(&self, id: Uuid) -> Result<Option<Item>>;
    fn list_items(&self, list_id: Uuid) -> Result<Vec<Item>>;
    fn save_item_scheduling(
        &self,
        id: Uuid,
        expected_review_count: u32,
        state: &SchedulingState,
    ) -> Result<()>;
}

/// In-process repository backed by a locked map.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    items: RwLock<HashMap<Uuid, Item>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item.
    pub fn insert(&self, item: Item) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(item.id, item);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> Error {
    Error::Storage("item lock poisoned".to_string())
}

impl ItemRepository for MemoryRepository {
    fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(&id).cloned())
    }

    fn list_items(&self, list_id: Uuid) -> Result<Vec<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items
            .values()
            .filter(|item| item.list_id == list_id)
            .cloned()
            .collect())
    }

    fn save_item_scheduling(
        &self,
        id: Uuid,
        expected_review_count: u32,
        state: &SchedulingState,
    ) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        let item = items.get_mut(&id).ok_or(Error::ItemNotFound(id))?;

        let actual = item.scheduling.review_count;
        if actual != expected_review_count {
            return Err(Error::Conflict {
                id,
                expected: expected_review_count,
                actual,
            });
        }

        item.scheduling = state.clone();
        Ok(())
    }
}
