//! Common test utilities for integration tests.
//!
//! - TestContext wiring a ReviewService to an in-memory repository
//! - A clock the tests can move forward between reviews
//! - A repository that fails every write
//! - An in-memory sink for captured log output

pub mod fixtures;

use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use vocab_core::{
    Clock, FixedJitter, Item, ItemRepository, MemoryRepository, Result, ReviewService, Scheduler,
    SchedulingState,
};

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub type TestService = ReviewService<MemoryRepository, ManualClock, FixedJitter>;

/// Test context with a service over a fresh repository and a list id.
pub struct TestContext {
    pub service: TestService,
    pub list_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_jitter(1.0)
    }

    pub fn with_jitter(factor: f64) -> Self {
        let service = ReviewService::with_parts(
            MemoryRepository::new(),
            Scheduler::with_jitter(FixedJitter(factor)),
            ManualClock::new(start_time()),
        );
        Self {
            service,
            list_id: Uuid::new_v4(),
        }
    }

    /// Insert a fresh item into the context's list.
    pub fn add_word(&self, original: &str, translation: &str) -> Item {
        let item = Item::new(self.list_id, original, translation);
        self.service
            .repository()
            .insert(item.clone())
            .expect("insert item");
        item
    }

    /// Insert an item with a prepared scheduling state.
    pub fn add_word_with_state(&self, original: &str, state: SchedulingState) -> Item {
        let mut item = Item::new(self.list_id, original, original);
        item.scheduling = state;
        self.service
            .repository()
            .insert(item.clone())
            .expect("insert item");
        item
    }

    pub fn stored(&self, id: Uuid) -> Item {
        self.service
            .repository()
            .get_item(id)
            .expect("repository read")
            .expect("item exists")
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
}

/// Repository that reads from an inner store and rejects every write.
pub struct ReadOnlyRepository(pub MemoryRepository);

impl ItemRepository for ReadOnlyRepository {
    fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        self.0.get_item(id)
    }

    fn list_items(&self, list_id: Uuid) -> Result<Vec<Item>> {
        self.0.list_items(list_id)
    }

    fn save_item_scheduling(
        &self,
        _id: Uuid,
        _expected_review_count: u32,
        _state: &SchedulingState,
    ) -> Result<()> {
        Err(vocab_core::Error::Storage("write rejected".to_string()))
    }
}

/// Shared buffer usable as a `tracing_subscriber` writer.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log lock")).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
