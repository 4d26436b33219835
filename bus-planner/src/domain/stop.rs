//! Stops and their coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StopId;

/// Mean earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS 84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in metres (spherical law of cosines).
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlon = (other.lon - self.lon).to_radians();
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
        // Rounding can push identical points just past 1.0.
        cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
    }
}

/// Which of the two disjoint line registries a stop or line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// City lines.
    Urban,
    /// Lines serving the surrounding metropolitan area.
    Metropolitan,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Urban => f.write_str("urban"),
            NetworkKind::Metropolitan => f.write_str("metropolitan"),
        }
    }
}

/// A physical boarding point.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    /// Rider-facing name. Several stops may share it (one per direction,
    /// or several bays of a terminal).
    pub name: String,
    pub coordinate: Coordinate,
    /// Set on stops where lines start or end.
    pub terminal: bool,
    pub kind: NetworkKind,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, coordinate: Coordinate, kind: NetworkKind) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate,
            terminal: false,
            kind,
        }
    }

    /// Mark this stop as a line terminus.
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }
}
