//! Where per-stop timetables come from.
//!
//! The planner only needs [`TimetableSource`]: give it a stop id, get back
//! that stop's raw schedule blocks. Two sources ship with the crate, an
//! HTTP client for the published `tt/` files and a directory reader with
//! the same layout.

mod client;
mod directory;
mod error;

use std::future::Future;

pub use client::{TimetableClient, TimetableConfig};
pub use directory::DirectorySource;
pub use error::FetchError;

use crate::domain::StopId;
use crate::timetable::ScheduleBlock;

/// Trait for fetching raw stop timetables.
///
/// This abstraction allows the planner to be tested with in-memory data.
pub trait TimetableSource: Send + Sync {
    fn fetch(
        &self,
        stop: StopId,
    ) -> impl Future<Output = Result<Vec<ScheduleBlock>, FetchError>> + Send;
}

/// The source picked at startup.
#[derive(Debug, Clone)]
pub enum TimetableBackend {
    Http(TimetableClient),
    Directory(DirectorySource),
}

impl TimetableSource for TimetableBackend {
    async fn fetch(&self, stop: StopId) -> Result<Vec<ScheduleBlock>, FetchError> {
        match self {
            TimetableBackend::Http(client) => client.fetch(stop).await,
            TimetableBackend::Directory(dir) => dir.fetch(stop).await,
        }
    }
}
