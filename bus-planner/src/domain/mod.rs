//! Domain types for the bus journey planner.
//!
//! This module contains the core domain model types that represent
//! validated network data. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod ids;
mod line;
mod natural;
pub mod schedule;
mod stop;

pub use error::DomainError;
pub use ids::{LineId, StopId};
pub use line::{Direction, Line, LineInfo};
pub use natural::{natural_cmp, sort_naturally};
pub use schedule::{DayBucket, DecodedTime};
pub use stop::{Coordinate, NetworkKind, Stop};

#[cfg(test)]
pub(crate) use line::{test_info, test_line};
