//! Review submission and session building against a repository.

use uuid::Uuid;

use crate::algorithm::{JitterSource, Scheduler, SchedulingResult, ThreadJitter};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::repository::ItemRepository;
use crate::session::build_session;
use crate::stats::ListStats;
use crate::types::{EffectiveSettings, Item, Quality};

const DEFAULT_MAX_RETRIES: u32 = 5;

/// Ties the scheduler to a repository, a clock and a jitter source.
pub struct ReviewService<R, C = SystemClock, J = ThreadJitter> {
    repository: R,
    scheduler: Scheduler<J>,
    clock: C,
    max_retries: u32,
}

impl<R: ItemRepository> ReviewService<R> {
    /// Service on the system clock with thread-local jitter.
    pub fn new(repository: R) -> Self {
        Self::with_parts(repository, Scheduler::default(), SystemClock)
    }
}

impl<R, C, J> ReviewService<R, C, J>
where
    R: ItemRepository,
    C: Clock,
    J: JitterSource,
{
    pub fn with_parts(repository: R, scheduler: Scheduler<J>, clock: C) -> Self {
        Self {
            repository,
            scheduler,
            clock,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Retries allowed after a lost compare-and-swap.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &Scheduler<J> {
        &self.scheduler
    }

    /// Record a review for an item and persist the new scheduling state.
    ///
    /// The quality is validated before anything is read. A write that loses
    /// the race to a concurrent review is recomputed from the fresh record.
    /// Any other repository error means nothing was committed.
    pub fn submit_review(&self, id: Uuid, quality: u8) -> Result<SchedulingResult> {
        let quality = Quality::new(quality)?;
        let _span = tracing::debug_span!("submit_review", item_id = %id).entered();
        let mut attempt = 0;

        loop {
            let item = self
                .repository
                .get_item(id)?
                .ok_or(Error::ItemNotFound(id))?;
            let expected = item.scheduling.review_count;
            let result = self
                .scheduler
                .apply_review(&item.scheduling, quality, self.clock.now());

            match self
                .repository
                .save_item_scheduling(id, expected, &result.new_state)
            {
                Ok(()) => {
                    tracing::info!(
                        item_id = %id,
                        quality = quality.value(),
                        review_count = result.new_state.review_count,
                        next_due = %result.next_due,
                        "review committed"
                    );
                    return Ok(result);
                }
                Err(Error::Conflict { actual, .. }) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        item_id = %id,
                        expected,
                        actual,
                        attempt,
                        "concurrent review, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Due items of a list, ordered and cut to the session size.
    pub fn build_session(&self, list_id: Uuid, settings: &EffectiveSettings) -> Result<Vec<Item>> {
        let items = self.repository.list_items(list_id)?;
        let session: Vec<Item> = build_session(&items, self.clock.now(), settings)?
            .into_iter()
            .cloned()
            .collect();
        tracing::info!(list_id = %list_id, size = session.len(), "built session");
        Ok(session)
    }

    pub fn list_stats(&self, list_id: Uuid) -> Result<ListStats> {
        let items = self.repository.list_items(list_id)?;
        Ok(ListStats::collect(&items, self.clock.now()))
    }
}
