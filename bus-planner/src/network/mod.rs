//! The static bus network.
//!
//! [`Network`] is built once from a [`Dataset`] and then shared read-only.
//! It owns the line and stop registries, the stop graph used by route
//! search, the lines-per-stop listing and the terminal clusters.

mod graph;
mod registry;
mod serving;
mod terminals;

use std::collections::HashMap;

use tracing::{debug, info, warn};

pub use graph::{Edge, Graph, LineRef, TravelTime};
pub use registry::{LineRegistry, StopRegistry};
pub use serving::{ServingLine, ServingLines};
pub use terminals::{Terminal, TerminalId, TerminalMember, cluster_terminals};

use crate::dataset::{Dataset, LineRecord, NetworkData, parse_pair_key};
use crate::domain::{Coordinate, Direction, Line, LineId, LineInfo, NetworkKind, Stop, StopId};

#[derive(Debug, Clone)]
pub struct Network {
    urban: LineRegistry,
    metropolitan: LineRegistry,
    stops: StopRegistry,
    serving: ServingLines,
    graph: Graph,
    terminals: Vec<Terminal>,
}

impl Network {
    /// Build the network from the static dataset.
    ///
    /// Bad records never fail the build: a line with an unknown direction,
    /// an unknown stop or fewer than two stops is logged and left out.
    pub fn build(dataset: &Dataset) -> Self {
        let mut stops = StopRegistry::new();
        load_stops(&mut stops, &dataset.urban, NetworkKind::Urban);
        load_stops(&mut stops, &dataset.metropolitan, NetworkKind::Metropolitan);

        let urban = load_lines(&stops, &dataset.urban, NetworkKind::Urban);
        let metropolitan = load_lines(&stops, &dataset.metropolitan, NetworkKind::Metropolitan);

        let mut travel = HashMap::new();
        for (key, record) in &dataset.distances {
            match parse_pair_key(key) {
                Some(pair) => {
                    travel.insert(
                        pair,
                        TravelTime {
                            minutes: record.minutes,
                            distance_m: record.distance,
                        },
                    );
                }
                None => warn!(key = %key, "skipping malformed distance key"),
            }
        }

        let network = Self::from_parts(stops, urban, metropolitan, &travel);
        info!(
            stops = network.stops.len(),
            urban_lines = network.urban.len(),
            metropolitan_lines = network.metropolitan.len(),
            edges = network.graph.edge_count(),
            terminals = network.terminals.len(),
            "network loaded"
        );
        network
    }

    /// Assemble a network from already-validated registries.
    ///
    /// Siblings are linked here, so callers need not do it.
    pub fn from_parts(
        stops: StopRegistry,
        mut urban: LineRegistry,
        mut metropolitan: LineRegistry,
        travel: &HashMap<(StopId, StopId), TravelTime>,
    ) -> Self {
        urban.link_siblings();
        metropolitan.link_siblings();

        for line in urban.iter().chain(metropolitan.iter()) {
            for (from, to) in line.hops() {
                if travel.contains_key(&(from, to)) {
                    continue;
                }
                // The metropolitan table is known to be sparse.
                match line.kind {
                    NetworkKind::Urban => {
                        warn!(line = %line.id, %from, %to, "no travel time for hop")
                    }
                    NetworkKind::Metropolitan => {
                        debug!(line = %line.id, %from, %to, "no travel time for hop")
                    }
                }
            }
        }

        let graph = Graph::build(urban.iter().chain(metropolitan.iter()), travel);
        let serving = ServingLines::build(urban.iter().chain(metropolitan.iter()));

        for stop in stops.iter() {
            if !serving.is_served(stop.id) {
                warn!(stop = %stop.id, name = %stop.name, "stop is served by no line");
            }
        }

        let terminals = cluster_terminals(&stops, &[&urban, &metropolitan]);

        Self {
            urban,
            metropolitan,
            stops,
            serving,
            graph,
            terminals,
        }
    }

    /// The registry for one network kind.
    pub fn lines(&self, kind: NetworkKind) -> &LineRegistry {
        match kind {
            NetworkKind::Urban => &self.urban,
            NetworkKind::Metropolitan => &self.metropolitan,
        }
    }

    /// Look a line up in either registry, urban first.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.urban.get(id).or_else(|| self.metropolitan.get(id))
    }

    /// Every line, urban then metropolitan, in load order.
    pub fn all_lines(&self) -> impl Iterator<Item = &Line> {
        self.urban.iter().chain(self.metropolitan.iter())
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn stops(&self) -> &StopRegistry {
        &self.stops
    }

    pub fn serving_lines(&self) -> &ServingLines {
        &self.serving
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// Fewest-hop route; see [`Graph::find_route`].
    pub fn find_route(&self, from: StopId, to: StopId) -> Vec<StopId> {
        self.graph.find_route(from, to)
    }
}

fn load_stops(stops: &mut StopRegistry, data: &NetworkData, kind: NetworkKind) {
    for record in &data.stops {
        let stop = Stop::new(
            record.id,
            record.name.clone(),
            Coordinate::new(record.lat, record.lon),
            kind,
        )
        .with_terminal(record.terminal);
        if !stops.insert(stop) {
            warn!(stop = %record.id, %kind, "duplicate stop id, keeping the first");
        }
    }
}

fn load_lines(stops: &StopRegistry, data: &NetworkData, kind: NetworkKind) -> LineRegistry {
    let mut registry = LineRegistry::new(kind);
    for record in &data.lines {
        let Some(line) = line_from_record(stops, record, kind) else {
            continue;
        };
        if !registry.insert(line) {
            warn!(line = %record.id, %kind, "duplicate line id, keeping the first");
        }
    }
    registry
}

fn line_from_record(stops: &StopRegistry, record: &LineRecord, kind: NetworkKind) -> Option<Line> {
    let direction = match Direction::from_code(record.direction) {
        Ok(direction) => direction,
        Err(e) => {
            warn!(line = %record.id, error = %e, "skipping line");
            return None;
        }
    };

    if let Some(missing) = record.stops.iter().find(|&&s| !stops.contains(s)) {
        warn!(line = %record.id, stop = %missing, "skipping line with unknown stop");
        return None;
    }

    let info = LineInfo {
        id: record.id,
        number: record.number.clone(),
        name: record.name.clone(),
        color: record.color.clone(),
        direction,
        from: record.from.clone(),
        to: record.to.clone(),
        sibling: record.sibling_id,
        kind,
    };
    match Line::new(info, record.stops.clone()) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(line = %record.id, error = %e, "skipping line");
            None
        }
    }
}

/// Urban network over the given stops and lines, no travel times.
#[cfg(test)]
pub(crate) fn test_network(stops: &[(u64, &str)], lines: Vec<Line>) -> Network {
    let mut registry = StopRegistry::new();
    for &(id, name) in stops {
        registry.insert(Stop::new(
            StopId(id),
            name,
            Coordinate::new(45.65, 25.6),
            NetworkKind::Urban,
        ));
    }
    let mut urban = LineRegistry::new(NetworkKind::Urban);
    for line in lines {
        urban.insert(line);
    }
    Network::from_parts(
        registry,
        urban,
        LineRegistry::new(NetworkKind::Metropolitan),
        &HashMap::new(),
    )
}
