//! Record shapes of the static network dataset.
//!
//! The published data files use one-letter keys (`i`, `n`, `s`, ...) to
//! keep them small; the descriptive names are accepted as well.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{LineId, StopId};

/// One directed line as published.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    #[serde(alias = "i")]
    pub id: LineId,
    #[serde(default)]
    pub sibling_id: Option<LineId>,
    #[serde(alias = "b")]
    pub name: String,
    #[serde(alias = "f")]
    pub from: String,
    #[serde(alias = "t")]
    pub to: String,
    #[serde(alias = "n")]
    pub number: String,
    #[serde(alias = "c")]
    pub color: String,
    /// 1 = outbound, 2 = inbound.
    #[serde(alias = "d")]
    pub direction: u8,
    #[serde(alias = "s")]
    pub stops: Vec<StopId>,
}

/// One stop as published.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopRecord {
    #[serde(alias = "i")]
    pub id: StopId,
    #[serde(alias = "n")]
    pub name: String,
    #[serde(alias = "lt")]
    pub lat: f64,
    #[serde(alias = "ln")]
    pub lon: f64,
    #[serde(default, alias = "t")]
    pub terminal: bool,
}

/// Lines and stops of one registry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetworkData {
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
}

/// Measured travel between two consecutive stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TravelRecord {
    /// Distance in metres.
    #[serde(alias = "d")]
    pub distance: u32,
    /// Average travel time in minutes.
    #[serde(alias = "m")]
    pub minutes: u32,
}

/// The complete static dataset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub urban: NetworkData,
    #[serde(default)]
    pub metropolitan: NetworkData,
    /// Keyed by `"{from}-{to}"`.
    #[serde(default)]
    pub distances: HashMap<String, TravelRecord>,
}

/// Split a `"{from}-{to}"` distance key.
pub fn parse_pair_key(key: &str) -> Option<(StopId, StopId)> {
    let (from, to) = key.split_once('-')?;
    Some((from.parse().ok()?, to.parse().ok()?))
}
