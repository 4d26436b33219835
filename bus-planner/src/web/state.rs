//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedTimetables;
use crate::network::Network;
use crate::planner::PlannerConfig;
use crate::source::TimetableBackend;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The static network, built at startup
    pub network: Arc<Network>,

    /// Cached timetable source
    pub timetables: Arc<CachedTimetables<TimetableBackend>>,

    /// Journey planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    pub fn new(
        network: Network,
        timetables: CachedTimetables<TimetableBackend>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            network: Arc::new(network),
            timetables: Arc::new(timetables),
            config: Arc::new(config),
        }
    }
}
