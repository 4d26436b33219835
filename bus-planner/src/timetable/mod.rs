//! Per-stop timetables.
//!
//! A stop's timetable arrives as a list of [`ScheduleBlock`]s: one per
//! line, each a list of packed departure codes. [`aggregate`] decodes them
//! against the network and splits them into today's departures and the
//! rest.

mod error;
mod types;

use chrono::{NaiveDateTime, Timelike};
use tracing::{trace, warn};

pub use error::TimetableError;
pub use types::{DayKind, DecodedDeparture, ScheduleBlock, StopTimetable};

use crate::domain::schedule::decode;
use crate::domain::{Stop, StopId};
use crate::network::Network;

/// Minutes since midnight of a wall-clock time.
pub fn minutes_of_day(now: NaiveDateTime) -> u16 {
    (now.hour() * 60 + now.minute()) as u16
}

/// Decode a stop's schedule blocks into a [`StopTimetable`] for `now`.
///
/// Line ids are resolved in the registry matching the stop's network kind;
/// blocks for unknown lines are logged and skipped. Returns
/// [`TimetableError::MissingStop`] without producing anything when `stop`
/// is `None`.
pub fn aggregate(
    stop: Option<&Stop>,
    blocks: &[ScheduleBlock],
    network: &Network,
    now: NaiveDateTime,
) -> Result<StopTimetable, TimetableError> {
    let stop = stop.ok_or(TimetableError::MissingStop)?;
    let today = DayKind::of(now.date());
    let now_minutes = minutes_of_day(now);
    let registry = network.lines(stop.kind);

    let mut current = Vec::new();
    let mut extra = Vec::new();

    for block in blocks {
        let Some(line) = registry.get(block.line) else {
            warn!(
                stop = %stop.id,
                line = %block.line,
                kind = %stop.kind,
                "timetable references unknown line, skipping"
            );
            continue;
        };

        for &code in &block.times {
            let time = decode(code);
            let is_current = today.is_current(time.day);
            let departure = DecodedDeparture {
                line: line.id,
                number: line.number.clone(),
                destination: line.to.clone(),
                color: line.color.clone(),
                day: time.day,
                hour: time.hour,
                minute: time.minute,
                minutes: time.minutes_since_midnight,
                raw: code,
                future: is_current && time.minutes_since_midnight > now_minutes,
            };
            if is_current {
                current.push(departure);
            } else {
                extra.push(departure);
            }
        }
    }

    // Stable: equal minutes keep fetch order.
    current.sort_by_key(|d| d.minutes);
    extra.sort_by_key(|d| d.minutes);

    let first_future_occurrence = current.iter().find(|d| d.future).map(|d| d.minutes);

    trace!(
        stop = %stop.id,
        current = current.len(),
        extra = extra.len(),
        "aggregated timetable"
    );

    Ok(StopTimetable {
        stop: stop.id,
        current,
        extra,
        first_future_occurrence,
        lines: network.serving_lines().at(stop.id).to_vec(),
    })
}

/// [`aggregate`] for a stop id, failing if the network does not know it.
pub fn aggregate_for(
    stop: StopId,
    blocks: &[ScheduleBlock],
    network: &Network,
    now: NaiveDateTime,
) -> Result<StopTimetable, TimetableError> {
    let found = network.stop(stop).ok_or(TimetableError::UnknownStop(stop))?;
    aggregate(Some(found), blocks, network, now)
}
