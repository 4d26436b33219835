//! Web layer for the bus journey planner.
//!
//! JSON endpoints for the line listing, per-stop lines and timetables,
//! terminals, route search and journey planning.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
