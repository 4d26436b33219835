//! Timetable aggregation errors.

use crate::domain::StopId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    /// No stop was given to aggregate for
    #[error("no target stop for timetable")]
    MissingStop,

    /// The stop id is not in the network
    #[error("unknown stop {0}")]
    UnknownStop(StopId),
}
