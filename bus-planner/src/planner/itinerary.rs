//! Itinerary resolution.
//!
//! Turns a route found by [`Graph::find_route`](crate::network::Graph::find_route)
//! into a boarding plan using the timetables of the stops along it. The walk
//! is a single greedy forward pass: the earliest usable departure is taken
//! at every step and never revisited, so a quicker itinerary that waits for
//! a later through-service can be missed.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::{Line, LineId, StopId};
use crate::network::Network;
use crate::timetable::StopTimetable;

/// One boarded hop between consecutive route stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryEdge {
    pub from: StopId,
    pub to: StopId,
    pub line: LineId,
    pub number: String,
    pub color: String,
    /// Departure from `from`, minutes since midnight.
    pub departure: u16,
}

/// A resolved boarding plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub legs: Vec<ItineraryEdge>,
    /// Minutes since midnight at the destination.
    pub arrival: u16,
}

impl Itinerary {
    /// Number of times the rider changes line.
    pub fn transfers(&self) -> usize {
        self.legs
            .windows(2)
            .filter(|pair| pair[0].line != pair[1].line)
            .count()
    }

    /// Minute of the first boarding, if there is one.
    pub fn departure(&self) -> Option<u16> {
        self.legs.first().map(|leg| leg.departure)
    }
}

/// Why a route could not be turned into an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    #[error("route has no stops")]
    EmptyRoute,

    /// A stop on the route has no decoded timetable
    #[error("no timetable for stop {0}")]
    MissingTimetable(StopId),

    /// Nothing leaves the stop in time
    #[error("no departure from stop {stop} at or after minute {after}")]
    NoDeparture {
        stop: StopId,
        line: Option<LineId>,
        after: u16,
    },

    /// A timetable names a line the network does not have
    #[error("unknown line {0}")]
    UnknownLine(LineId),

    /// No line makes the hop in time
    #[error("no line from stop {from} to stop {to} at or after minute {after}")]
    NoTransfer { from: StopId, to: StopId, after: u16 },

    /// The line ends before the destination and has no opposite direction
    #[error("line {0} has no sibling")]
    NoSibling(LineId),

    #[error("sibling line {sibling} has no departure at any stop named {name:?}")]
    NoSiblingDeparture { sibling: LineId, name: String },
}

/// Resolve a boarding plan along `stops` ending at `destination`.
///
/// `stops` is the route without its last stop; `destination` is the last
/// stop. Every stop of the route, and the same-named stops the sibling
/// fallback may consult, should have a timetable in `timetables`.
///
/// When the active line reaches its last stop before the destination, the
/// walk stops there and the destination is reached through the sibling.
pub fn resolve_itinerary(
    network: &Network,
    stops: &[StopId],
    destination: StopId,
    timetables: &HashMap<StopId, StopTimetable>,
    now_minutes: u16,
) -> Result<Itinerary, ItineraryError> {
    let Some((&origin, _)) = stops.split_first() else {
        return Err(ItineraryError::EmptyRoute);
    };
    let boarding = timetable(timetables, origin)?
        .first_departure(now_minutes)
        .ok_or(ItineraryError::NoDeparture {
            stop: origin,
            line: None,
            after: now_minutes,
        })?;
    let mut active = line_at(network, origin, boarding.line)?;
    let mut clock = now_minutes;
    let mut legs = Vec::with_capacity(stops.len());

    debug!(line = %active.number, stop = %origin, minute = boarding.minutes, "boarding");

    // Index of the route stop where the active line terminated.
    let mut terminated = None;

    for (i, &stop) in stops.iter().enumerate() {
        if i > 0 && !active.serves(stop) {
            (active, clock) = transfer(network, timetables, stops[i - 1], stop, clock)?;
        }

        let next = timetable(timetables, stop)?.next_departure(clock, active.id);
        if i > 0 {
            legs.push(edge(stops[i - 1], stop, active, clock));
        }

        match next {
            Some(next) => {
                clock = next.minutes;
                trace!(line = %active.number, %stop, minute = clock, "passing");
            }
            None if i > 0 && stop == active.last_stop() => {
                debug!(line = %active.number, %stop, "line terminates before the destination");
                terminated = Some(i);
                break;
            }
            None => {
                return Err(ItineraryError::NoDeparture {
                    stop,
                    line: Some(active.id),
                    after: clock,
                });
            }
        }
    }

    let last = stops[stops.len() - 1];
    let mut missed = None;
    if let Some(end) = terminated {
        // The rest of the route is walked within the terminus.
        for pair in stops[end..].windows(2) {
            legs.push(edge(pair[0], pair[1], active, clock));
        }
    } else if !active.serves(destination) {
        match transfer(network, timetables, last, destination, clock) {
            Ok(switch) => {
                (active, clock) = switch;
            }
            Err(e) => missed = Some(e),
        }
    }
    legs.push(edge(last, destination, active, clock));

    // A missed connection can still end at a same-named stop of the sibling.
    clock = match drop_off(network, timetables, destination, active, clock) {
        Ok(arrival) => arrival,
        Err(e) => return Err(missed.unwrap_or(e)),
    };

    Ok(Itinerary {
        legs,
        arrival: clock,
    })
}

/// Change to the first line leaving `prev` for `next` at or after `clock`.
fn transfer<'n>(
    network: &'n Network,
    timetables: &HashMap<StopId, StopTimetable>,
    prev: StopId,
    next: StopId,
    clock: u16,
) -> Result<(&'n Line, u16), ItineraryError> {
    // Departures at `prev` carry ids from the registry of its own kind.
    let kind = network.stop(prev).map(|s| s.kind);
    let candidates: Vec<LineId> = network
        .graph()
        .lines_between(prev, next)
        .iter()
        .filter(|line| Some(line.kind) == kind)
        .map(|line| line.id)
        .collect();
    let departure = timetable(timetables, prev)?
        .next_departure_among(clock, &candidates)
        .ok_or(ItineraryError::NoTransfer {
            from: prev,
            to: next,
            after: clock,
        })?;
    let line = line_at(network, prev, departure.line)?;
    debug!(line = %line.number, stop = %prev, minute = departure.minutes, "transfer");
    Ok((line, departure.minutes))
}

/// Minute the active line reaches `destination`.
///
/// At a terminus the arriving line has no departures of its own; the
/// opposite direction leaving from a same-named stop stands in for it.
fn drop_off(
    network: &Network,
    timetables: &HashMap<StopId, StopTimetable>,
    destination: StopId,
    active: &Line,
    clock: u16,
) -> Result<u16, ItineraryError> {
    if let Some(direct) = timetable(timetables, destination)?.next_departure(clock, active.id) {
        return Ok(direct.minutes);
    }

    let sibling_id = active.sibling.ok_or(ItineraryError::NoSibling(active.id))?;
    let sibling = network
        .lines(active.kind)
        .get(sibling_id)
        .ok_or(ItineraryError::UnknownLine(sibling_id))?;

    let name = network
        .stop(destination)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    let no_departure = || ItineraryError::NoSiblingDeparture {
        sibling: sibling.id,
        name: name.clone(),
    };

    let stop = network
        .stops()
        .named(&name)
        .iter()
        .copied()
        .find(|&s| sibling.serves(s))
        .ok_or_else(no_departure)?;

    let departure = timetable(timetables, stop)?
        .next_departure(clock, sibling.id)
        .ok_or_else(no_departure)?;

    debug!(sibling = %sibling.id, %stop, minute = departure.minutes, "terminus via sibling");
    Ok(departure.minutes)
}

fn timetable(
    timetables: &HashMap<StopId, StopTimetable>,
    stop: StopId,
) -> Result<&StopTimetable, ItineraryError> {
    timetables
        .get(&stop)
        .ok_or(ItineraryError::MissingTimetable(stop))
}

/// Look a line up in the registry of the stop it was seen at.
fn line_at(network: &Network, stop: StopId, line: LineId) -> Result<&Line, ItineraryError> {
    let found = match network.stop(stop) {
        Some(s) => network.lines(s.kind).get(line),
        None => network.line(line),
    };
    found.ok_or(ItineraryError::UnknownLine(line))
}

fn edge(from: StopId, to: StopId, line: &Line, departure: u16) -> ItineraryEdge {
    ItineraryEdge {
        from,
        to,
        line: line.id,
        number: line.number.clone(),
        color: line.color.clone(),
        departure,
    }
}
