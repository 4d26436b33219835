//! Journey planning.
//!
//! Ties the pieces together for one request: find the route, fetch the
//! timetables of every stop on it, decode them and resolve the itinerary.
//! The resolver needs every timetable before its first step, so fetches
//! fan out in batches and are all joined before anything is resolved.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::domain::StopId;
use crate::network::Network;
use crate::source::{FetchError, TimetableSource};
use crate::timetable::{ScheduleBlock, StopTimetable, TimetableError, aggregate_for, minutes_of_day};

use super::config::PlannerConfig;
use super::itinerary::{Itinerary, ItineraryError, resolve_itinerary};

/// Error from journey planning.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    #[error("origin and destination are both stop {0}")]
    SameStop(StopId),

    /// No route exists in the stop graph
    #[error("no route from stop {from} to stop {to}")]
    Unreachable { from: StopId, to: StopId },

    /// A timetable on the route could not be fetched
    #[error("failed to fetch timetable for stop {stop}: {source}")]
    Fetch {
        stop: StopId,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Timetable(#[from] TimetableError),

    /// The route exists but no boarding plan fits today's timetables
    #[error("no itinerary: {0}")]
    Unresolved(#[from] ItineraryError),
}

/// A planned journey.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyPlan {
    /// Every stop from origin to destination.
    pub route: Vec<StopId>,
    pub itinerary: Itinerary,
}

/// Journey planner for one network and timetable source.
pub struct JourneyPlanner<'a, S> {
    network: &'a Network,
    source: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: TimetableSource> JourneyPlanner<'a, S> {
    pub fn new(network: &'a Network, source: &'a S, config: &'a PlannerConfig) -> Self {
        Self {
            network,
            source,
            config,
        }
    }

    /// Plan a journey leaving `origin` no earlier than `now`.
    pub async fn plan(
        &self,
        origin: StopId,
        destination: StopId,
        now: NaiveDateTime,
    ) -> Result<JourneyPlan, PlanError> {
        let network = self.network;
        for stop in [origin, destination] {
            if network.stop(stop).is_none() {
                return Err(PlanError::UnknownStop(stop));
            }
        }
        if origin == destination {
            return Err(PlanError::SameStop(origin));
        }

        let route = network.find_route(origin, destination);
        if route.is_empty() {
            info!(from = %origin, to = %destination, "no route");
            return Err(PlanError::Unreachable {
                from: origin,
                to: destination,
            });
        }
        debug!(from = %origin, to = %destination, hops = route.len() - 1, "route found");

        let blocks = self.fetch_timetables(&route, destination).await?;

        let mut timetables: HashMap<StopId, StopTimetable> = HashMap::with_capacity(blocks.len());
        for (stop, stop_blocks) in blocks {
            timetables.insert(stop, aggregate_for(stop, &stop_blocks, network, now)?);
        }

        let itinerary = resolve_itinerary(
            network,
            &route[..route.len() - 1],
            destination,
            &timetables,
            minutes_of_day(now),
        )
        .inspect_err(|e| info!(from = %origin, to = %destination, error = %e, "unresolved"))?;

        Ok(JourneyPlan { route, itinerary })
    }

    /// Fetch every route stop, plus the stops sharing the destination's
    /// name for the terminus fallback.
    ///
    /// A failure on the route aborts the request. The extra terminus stops
    /// are best-effort.
    async fn fetch_timetables(
        &self,
        route: &[StopId],
        destination: StopId,
    ) -> Result<Vec<(StopId, Vec<ScheduleBlock>)>, PlanError> {
        let mut wanted: Vec<(StopId, bool)> = route.iter().map(|&s| (s, true)).collect();
        if let Some(stop) = self.network.stop(destination) {
            for &other in self.network.stops().named(&stop.name) {
                if !route.contains(&other) {
                    wanted.push((other, false));
                }
            }
        }

        let mut fetched = Vec::with_capacity(wanted.len());
        let timeout = self.config.fetch_timeout();

        for batch in wanted.chunks(self.config.batch_size.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&(stop, required)| async move {
                    let result = match tokio::time::timeout(timeout, self.source.fetch(stop)).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout(stop)),
                    };
                    (stop, required, result)
                })
                .collect();

            for (stop, required, result) in join_all(futures).await {
                match result {
                    Ok(blocks) => fetched.push((stop, blocks)),
                    Err(e) if required => {
                        error!(%stop, error = %e, "timetable fetch failed, aborting plan");
                        return Err(PlanError::Fetch { stop, source: e });
                    }
                    Err(e) => {
                        debug!(%stop, error = %e, "skipping terminus candidate");
                    }
                }
            }
        }

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use crate::domain::schedule::encode;
    use crate::domain::{DayBucket, LineId, test_line};
    use crate::network::test_network;

    /// In-memory source; stops without blocks are not found.
    #[derive(Default)]
    struct MockSource {
        blocks: HashMap<StopId, Vec<ScheduleBlock>>,
        calls: Mutex<Vec<StopId>>,
    }

    impl MockSource {
        fn add(&mut self, stop: u64, blocks: Vec<ScheduleBlock>) {
            self.blocks.insert(StopId(stop), blocks);
        }

        fn calls(&self) -> Vec<StopId> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }
    }

    impl TimetableSource for MockSource {
        async fn fetch(&self, stop: StopId) -> Result<Vec<ScheduleBlock>, FetchError> {
            self.calls.lock().unwrap().push(stop);
            self.blocks
                .get(&stop)
                .cloned()
                .ok_or(FetchError::NotFound(stop))
        }
    }

    fn block(line: u64, times: &[(u8, u8)]) -> ScheduleBlock {
        ScheduleBlock {
            line: LineId(line),
            times: times
                .iter()
                .map(|&(h, m)| encode(DayBucket::WEEKDAYS, h, m))
                .collect(),
        }
    }

    /// 07:55 on Monday 2024-06-03.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(7, 55, 0)
            .unwrap()
    }

    /// Line 1: 1 -> 2 -> 4. Line 2: 5 -> 2 -> 3 -> 6.
    fn network() -> Network {
        test_network(
            &[(1, "S1"), (2, "S2"), (3, "S3"), (4, "Far"), (5, "Start"), (6, "Beyond")],
            vec![test_line(1, "1", &[1, 2, 4]), test_line(2, "2", &[5, 2, 3, 6])],
        )
    }

    fn source() -> MockSource {
        let mut source = MockSource::default();
        source.add(1, vec![block(1, &[(8, 0)])]);
        source.add(2, vec![block(1, &[(8, 5)]), block(2, &[(8, 3), (8, 10)])]);
        source.add(3, vec![block(2, &[(8, 15)])]);
        source
    }

    #[tokio::test]
    async fn plans_journey_with_transfer() {
        let network = network();
        let source = source();
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let plan = planner.plan(StopId(1), StopId(3), now()).await.unwrap();

        assert_eq!(plan.route, vec![StopId(1), StopId(2), StopId(3)]);
        let lines: Vec<_> = plan.itinerary.legs.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![LineId(1), LineId(2)]);
        assert_eq!(plan.itinerary.arrival, 8 * 60 + 15);
        assert_eq!(source.calls(), vec![StopId(1), StopId(2), StopId(3)]);
    }

    #[tokio::test]
    async fn small_batches_fetch_everything() {
        let network = network();
        let source = source();
        let config = PlannerConfig::new(1, 5);
        let planner = JourneyPlanner::new(&network, &source, &config);

        let plan = planner.plan(StopId(1), StopId(3), now()).await.unwrap();
        assert_eq!(plan.itinerary.legs.len(), 2);
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn rejects_unknown_and_same_stops() {
        let network = network();
        let source = source();
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let err = planner.plan(StopId(1), StopId(99), now()).await.unwrap_err();
        assert!(matches!(err, PlanError::UnknownStop(StopId(99))));

        let err = planner.plan(StopId(2), StopId(2), now()).await.unwrap_err();
        assert!(matches!(err, PlanError::SameStop(StopId(2))));

        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn unreachable_is_reported() {
        let network = network();
        let source = source();
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let err = planner.plan(StopId(3), StopId(1), now()).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Unreachable {
                from: StopId(3),
                to: StopId(1)
            }
        ));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn route_fetch_failure_aborts() {
        let network = network();
        let mut source = source();
        source.blocks.remove(&StopId(2));
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let err = planner.plan(StopId(1), StopId(3), now()).await.unwrap_err();
        match err {
            PlanError::Fetch { stop, source } => {
                assert_eq!(stop, StopId(2));
                assert!(matches!(source, FetchError::NotFound(StopId(2))));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresolved_itinerary_is_reported() {
        let network = network();
        let mut source = source();
        // The connection at stop 2 leaves before line 1 gets there.
        source.add(2, vec![block(1, &[(8, 5)]), block(2, &[(8, 3)])]);
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let err = planner.plan(StopId(1), StopId(3), now()).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Unresolved(ItineraryError::NoTransfer { .. })
        ));
    }

    #[tokio::test]
    async fn terminus_candidates_are_fetched() {
        // Line 7 ends at one "Hub" bay; its sibling leaves from another.
        let network = test_network(
            &[(1, "A"), (2, "B"), (3, "Hub"), (4, "Hub"), (5, "Hub")],
            vec![test_line(7, "7", &[1, 2, 3]), test_line(8, "7", &[4, 2, 1])],
        );
        let mut source = MockSource::default();
        source.add(1, vec![block(7, &[(8, 0)])]);
        source.add(2, vec![block(7, &[(8, 5)])]);
        source.add(3, vec![]);
        source.add(4, vec![block(8, &[(8, 12)])]);
        // Stop 5 has no timetable; it is only a candidate, so that is fine.
        let config = PlannerConfig::default();
        let planner = JourneyPlanner::new(&network, &source, &config);

        let plan = planner.plan(StopId(1), StopId(3), now()).await.unwrap();
        assert_eq!(plan.itinerary.arrival, 8 * 60 + 12);
        assert_eq!(
            source.calls(),
            vec![StopId(1), StopId(2), StopId(3), StopId(4), StopId(5)]
        );
    }

    #[test]
    fn error_display() {
        let err = PlanError::Unreachable {
            from: StopId(1),
            to: StopId(2),
        };
        assert_eq!(err.to_string(), "no route from stop 1 to stop 2");

        let err = PlanError::Fetch {
            stop: StopId(7),
            source: FetchError::NotFound(StopId(7)),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch timetable for stop 7: no timetable for stop 7"
        );

        let err = PlanError::Unresolved(ItineraryError::NoSibling(LineId(3)));
        assert_eq!(err.to_string(), "no itinerary: line 3 has no sibling");
    }
}
