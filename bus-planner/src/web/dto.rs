//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Line, LineId, NetworkKind, Stop, StopId};
use crate::network::{Edge, Network, ServingLine};
use crate::planner::JourneyPlan;

/// Query for the route and journey endpoints.
#[derive(Debug, Deserialize)]
pub struct TripQuery {
    /// Origin stop id
    pub from: String,

    /// Destination stop id
    pub to: String,

    /// Local time as `YYYY-MM-DDTHH:MM` (defaults to now)
    pub at: Option<String>,
}

/// Query for the timetable endpoint.
#[derive(Debug, Deserialize)]
pub struct TimeQuery {
    /// Local time as `YYYY-MM-DDTHH:MM` (defaults to now)
    pub at: Option<String>,
}

/// A line in listings.
#[derive(Debug, Serialize)]
pub struct LineSummary {
    pub id: LineId,
    pub number: String,
    pub name: String,
    pub color: String,
    pub direction: Direction,
    pub from: String,
    pub to: String,
    pub sibling: Option<LineId>,
    pub kind: NetworkKind,
    pub stops: Vec<StopId>,
}

impl LineSummary {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id,
            number: line.number.clone(),
            name: line.name.clone(),
            color: line.color.clone(),
            direction: line.direction,
            from: line.from.clone(),
            to: line.to.clone(),
            sibling: line.sibling,
            kind: line.kind,
            stops: line.stops().to_vec(),
        }
    }
}

/// Response listing every line, naturally sorted by number.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub urban: Vec<LineSummary>,
    pub metropolitan: Vec<LineSummary>,
}

/// A stop in responses.
#[derive(Debug, Serialize)]
pub struct StopView {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub terminal: bool,
    pub kind: NetworkKind,
}

impl StopView {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id,
            name: stop.name.clone(),
            lat: stop.coordinate.lat,
            lon: stop.coordinate.lon,
            terminal: stop.terminal,
            kind: stop.kind,
        }
    }

    /// Look a stop up, falling back to a bare id for unknown stops.
    pub fn lookup(network: &Network, id: StopId) -> Self {
        match network.stop(id) {
            Some(stop) => Self::from_stop(stop),
            None => Self {
                id,
                name: String::new(),
                lat: 0.0,
                lon: 0.0,
                terminal: false,
                kind: NetworkKind::Urban,
            },
        }
    }
}

/// Lines serving one stop.
#[derive(Debug, Serialize)]
pub struct StopLinesResponse {
    pub stop: StopView,
    pub lines: Vec<ServingLine>,
}

/// Response for a route search.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub stops: Vec<StopView>,
    pub edges: Vec<Edge>,
    pub hops: usize,
    /// Sum of the known average travel times.
    pub minutes: u32,
}

impl RouteResponse {
    pub fn from_route(network: &Network, route: &[StopId]) -> Self {
        let edges: Vec<Edge> = route
            .windows(2)
            .filter_map(|pair| network.graph().edge(pair[0], pair[1]).cloned())
            .collect();
        Self {
            stops: route.iter().map(|&id| StopView::lookup(network, id)).collect(),
            minutes: edges.iter().filter_map(|e| e.weight).map(|w| w.minutes).sum(),
            hops: route.len().saturating_sub(1),
            edges,
        }
    }
}

/// One boarded hop in a journey response.
#[derive(Debug, Serialize)]
pub struct LegView {
    pub from: StopId,
    pub from_name: String,
    pub to: StopId,
    pub to_name: String,
    pub line: LineId,
    pub number: String,
    pub color: String,
    /// `HH:MM`
    pub departure: String,
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub stops: Vec<StopView>,
    pub legs: Vec<LegView>,
    pub transfers: usize,
    /// `HH:MM` of the first boarding
    pub departure: Option<String>,
    /// `HH:MM` at the destination
    pub arrival: String,
}

impl JourneyResponse {
    pub fn from_plan(network: &Network, plan: &JourneyPlan) -> Self {
        let name = |id: StopId| network.stop(id).map(|s| s.name.clone()).unwrap_or_default();
        let legs = plan
            .itinerary
            .legs
            .iter()
            .map(|leg| LegView {
                from: leg.from,
                from_name: name(leg.from),
                to: leg.to,
                to_name: name(leg.to),
                line: leg.line,
                number: leg.number.clone(),
                color: leg.color.clone(),
                departure: format_minutes(leg.departure),
            })
            .collect();

        Self {
            stops: plan
                .route
                .iter()
                .map(|&id| StopView::lookup(network, id))
                .collect(),
            legs,
            transfers: plan.itinerary.transfers(),
            departure: plan.itinerary.departure().map(format_minutes),
            arrival: format_minutes(plan.itinerary.arrival),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `HH:MM` for minutes since midnight.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
