//! Line and stop registries.

use std::collections::HashMap;

use crate::domain::{Line, LineId, NetworkKind, Stop, StopId};

/// All lines of one [`NetworkKind`], in load order.
#[derive(Debug, Clone)]
pub struct LineRegistry {
    kind: NetworkKind,
    lines: Vec<Line>,
    index: HashMap<LineId, usize>,
}

impl LineRegistry {
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// Add a line. Returns `false` (and keeps the existing one) if the id
    /// is already registered.
    pub fn insert(&mut self, line: Line) -> bool {
        if self.index.contains_key(&line.id) {
            return false;
        }
        self.index.insert(line.id, self.lines.len());
        self.lines.push(line);
        true
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.index.get(&id).map(|&idx| &self.lines[idx])
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.index.contains_key(&id)
    }

    /// Lines in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Pair up opposite directions of the same number.
    ///
    /// Lines whose sibling was not supplied get the last-loaded other line
    /// sharing their number. A number with three or more variants therefore
    /// links everything to one partner; that matches the published data,
    /// where extra variants are rare.
    pub fn link_siblings(&mut self) {
        let assignments: Vec<(usize, LineId)> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.sibling.is_none())
            .filter_map(|(idx, line)| {
                self.lines
                    .iter()
                    .rev()
                    .find(|other| other.number == line.number && other.id != line.id)
                    .map(|other| (idx, other.id))
            })
            .collect();

        for (idx, sibling) in assignments {
            self.lines[idx].sibling = Some(sibling);
        }
    }
}

/// All stops of both network kinds, with a name index.
#[derive(Debug, Clone, Default)]
pub struct StopRegistry {
    stops: Vec<Stop>,
    index: HashMap<StopId, usize>,
    by_name: HashMap<String, Vec<StopId>>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop. Returns `false` if the id is already registered.
    pub fn insert(&mut self, stop: Stop) -> bool {
        if self.index.contains_key(&stop.id) {
            return false;
        }
        self.index.insert(stop.id, self.stops.len());
        self.by_name
            .entry(stop.name.clone())
            .or_default()
            .push(stop.id);
        self.stops.push(stop);
        true
    }

    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.index.get(&id).map(|&idx| &self.stops[idx])
    }

    pub fn contains(&self, id: StopId) -> bool {
        self.index.contains_key(&id)
    }

    /// Stops in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// Ids of every stop with exactly this display name, in load order.
    pub fn named(&self, name: &str) -> &[StopId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
