//! Terminal clustering.
//!
//! Big interchanges publish one name for several physical bays. Two stops
//! sharing a name are just the two sides of the road; three or more are
//! grouped into a [`Terminal`] so riders can pick the right bay.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use super::{LineRegistry, StopRegistry};
use crate::domain::{Coordinate, StopId};

/// Smallest name group that forms a terminal.
const MIN_TERMINAL_MEMBERS: usize = 3;

/// Sequential id assigned to each terminal at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TerminalId(pub u32);

/// One stop of a terminal with its line counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalMember {
    pub stop: StopId,
    /// Lines whose last stop is this one.
    pub arrivals: u32,
    /// Lines whose first stop is this one.
    pub departures: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Terminal {
    pub id: TerminalId,
    pub name: String,
    /// Position of the first member.
    pub coordinate: Coordinate,
    pub members: Vec<TerminalMember>,
    pub arrivals: u32,
    pub departures: u32,
}

/// Group stops by name and emit a terminal for every group of three or more.
///
/// Terminals come out in the load order of their first member.
pub fn cluster_terminals(stops: &StopRegistry, registries: &[&LineRegistry]) -> Vec<Terminal> {
    let mut arrivals: HashMap<StopId, u32> = HashMap::new();
    let mut departures: HashMap<StopId, u32> = HashMap::new();

    for line in registries.iter().flat_map(|r| r.iter()) {
        for (endpoint, counts) in [
            (line.first_stop(), &mut departures),
            (line.last_stop(), &mut arrivals),
        ] {
            if !stops.contains(endpoint) {
                warn!(line = %line.id, stop = %endpoint, "line endpoint is not a known stop");
                continue;
            }
            *counts.entry(endpoint).or_default() += 1;
        }
    }

    let mut terminals = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    // Every stop is grouped; `Stop::terminal` is only passed through to clients.
    for stop in stops.iter() {
        if !seen.insert(stop.name.as_str()) {
            continue;
        }

        let group = stops.named(&stop.name);
        if group.len() < MIN_TERMINAL_MEMBERS {
            continue;
        }

        let members: Vec<TerminalMember> = group
            .iter()
            .map(|&id| TerminalMember {
                stop: id,
                arrivals: arrivals.get(&id).copied().unwrap_or(0),
                departures: departures.get(&id).copied().unwrap_or(0),
            })
            .collect();

        terminals.push(Terminal {
            id: TerminalId(terminals.len() as u32),
            name: stop.name.clone(),
            coordinate: stop.coordinate,
            arrivals: members.iter().map(|m| m.arrivals).sum(),
            departures: members.iter().map(|m| m.departures).sum(),
            members,
        });
    }

    debug!(terminals = terminals.len(), "clustered terminals");
    terminals
}
