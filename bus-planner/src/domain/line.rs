//! Bus lines.
//!
//! A `Line` is one direction of one numbered route. Most numbers come as a
//! pair of lines (outbound and inbound) which are each other's *sibling*.

use serde::{Deserialize, Serialize};

use super::{DomainError, LineId, NetworkKind, StopId};

/// Direction of travel as published in the line data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Parse the numeric code used by the data files (1 = outbound, 2 = inbound).
    pub fn from_code(code: u8) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Direction::Outbound),
            2 => Ok(Direction::Inbound),
            other => Err(DomainError::UnknownDirection(other)),
        }
    }
}

/// One directed service variant with its ordered stop sequence.
///
/// The sequence always has at least two stops; this is checked by
/// [`Line::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    /// Rider-facing number, e.g. `"2B"`. Not unique across directions.
    pub number: String,
    /// Long display name, e.g. `"1: Livada Postei - Triaj"`.
    pub name: String,
    /// Hex colour used for the line on maps and timetables.
    pub color: String,
    pub direction: Direction,
    /// Name of the first stop.
    pub from: String,
    /// Name of the last stop, shown as the destination on timetables.
    pub to: String,
    stops: Vec<StopId>,
    /// Opposite-direction line with the same number.
    pub sibling: Option<LineId>,
    pub kind: NetworkKind,
}

/// Everything needed to build a [`Line`] apart from the stop sequence.
#[derive(Debug, Clone)]
pub struct LineInfo {
    pub id: LineId,
    pub number: String,
    pub name: String,
    pub color: String,
    pub direction: Direction,
    pub from: String,
    pub to: String,
    pub sibling: Option<LineId>,
    pub kind: NetworkKind,
}

impl Line {
    /// Build a line, rejecting sequences with fewer than two stops.
    pub fn new(info: LineInfo, stops: Vec<StopId>) -> Result<Self, DomainError> {
        if stops.len() < 2 {
            return Err(DomainError::ShortLine {
                line: info.id,
                stops: stops.len(),
            });
        }
        Ok(Self {
            id: info.id,
            number: info.number,
            name: info.name,
            color: info.color,
            direction: info.direction,
            from: info.from,
            to: info.to,
            stops,
            sibling: info.sibling,
            kind: info.kind,
        })
    }

    /// The ordered stop sequence.
    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn first_stop(&self) -> StopId {
        self.stops[0]
    }

    pub fn last_stop(&self) -> StopId {
        self.stops[self.stops.len() - 1]
    }

    /// Index of the first occurrence of `stop` in the sequence.
    pub fn position_of(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|s| *s == stop)
    }

    pub fn serves(&self, stop: StopId) -> bool {
        self.stops.contains(&stop)
    }

    /// True if `to` immediately follows `from` somewhere in the sequence.
    pub fn connects(&self, from: StopId, to: StopId) -> bool {
        self.stops.windows(2).any(|pair| pair[0] == from && pair[1] == to)
    }

    /// Consecutive stop pairs, in sequence order.
    pub fn hops(&self) -> impl Iterator<Item = (StopId, StopId)> + '_ {
        self.stops.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
pub(crate) fn test_info(id: u64, number: &str) -> LineInfo {
    LineInfo {
        id: LineId(id),
        number: number.to_string(),
        name: format!("{number}: test"),
        color: "#00b64f".to_string(),
        direction: Direction::Outbound,
        from: "From".to_string(),
        to: "To".to_string(),
        sibling: None,
        kind: NetworkKind::Urban,
    }
}

#[cfg(test)]
pub(crate) fn test_line(id: u64, number: &str, stops: &[u64]) -> Line {
    Line::new(test_info(id, number), stops.iter().copied().map(StopId).collect()).unwrap()
}
