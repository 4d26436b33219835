//! Journey planner.
//!
//! This module answers "how do I get from this stop to that one, leaving
//! now?" in two steps: a fewest-hops route through the stop graph, then a
//! greedy walk along it with real timetables that picks which bus to
//! board at each step.

mod config;
mod itinerary;
mod journey;


pub use config::PlannerConfig;
pub use itinerary::{Itinerary, ItineraryEdge, ItineraryError, resolve_itinerary};
pub use journey::{JourneyPlan, JourneyPlanner, PlanError};
