//! Caching layer for stop timetables.
//!
//! Timetable documents change when the operator republishes them, not
//! during the day, so entries live for the whole process. Raw blocks are
//! cached rather than decoded timetables: which departures are current
//! and future depends on the request time.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::StopId;
use crate::source::{FetchError, TimetableSource};
use crate::timetable::ScheduleBlock;

/// Cached timetable entry.
type TimetableEntry = Arc<Vec<ScheduleBlock>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached stops.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_capacity: 2000 }
    }
}

/// Timetable source with caching.
///
/// Wraps any [`TimetableSource`]. Failed fetches are not cached.
pub struct CachedTimetables<S> {
    source: S,
    entries: MokaCache<StopId, TimetableEntry>,
}

impl<S: TimetableSource> CachedTimetables<S> {
    pub fn new(source: S, config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();
        Self { source, entries }
    }

    /// Get a stop's blocks, using the cache if available.
    pub async fn get(&self, stop: StopId) -> Result<TimetableEntry, FetchError> {
        if let Some(cached) = self.entries.get(&stop).await {
            trace!(%stop, "timetable cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.source.fetch(stop).await?);
        self.entries.insert(stop, entry.clone()).await;
        Ok(entry)
    }
}

impl<S: TimetableSource> TimetableSource for CachedTimetables<S> {
    async fn fetch(&self, stop: StopId) -> Result<Vec<ScheduleBlock>, FetchError> {
        Ok(self.get(stop).await?.as_ref().clone())
    }
}
