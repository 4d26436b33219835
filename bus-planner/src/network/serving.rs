//! Lines serving each stop.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Line, LineId, StopId, natural_cmp};

/// A line listed at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServingLine {
    pub line: LineId,
    pub number: String,
    pub color: String,
    pub to: String,
}

impl ServingLine {
    fn from_line(line: &Line) -> Self {
        Self {
            line: line.id,
            number: line.number.clone(),
            color: line.color.clone(),
            to: line.to.clone(),
        }
    }
}

/// Multimap from stop to the lines calling there.
///
/// The dedup key is the line *number*, not the id: both directions of
/// line 4 call at some stops, and riders should see "4" once. The first
/// line loaded for a number is the one listed. Each list is sorted
/// naturally by number.
#[derive(Debug, Clone, Default)]
pub struct ServingLines {
    by_stop: HashMap<StopId, Vec<ServingLine>>,
}

impl ServingLines {
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Self {
        let mut serving = Self::default();
        for line in lines {
            for &stop in line.stops() {
                serving.insert(stop, line);
            }
        }
        for entries in serving.by_stop.values_mut() {
            entries.sort_by(|a, b| natural_cmp(&a.number, &b.number));
        }
        serving
    }

    fn insert(&mut self, stop: StopId, line: &Line) {
        let entries = self.by_stop.entry(stop).or_default();
        if entries.iter().all(|e| e.number != line.number) {
            entries.push(ServingLine::from_line(line));
        }
    }

    /// Lines at a stop, naturally sorted by number.
    pub fn at(&self, stop: StopId) -> &[ServingLine] {
        self.by_stop.get(&stop).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_served(&self, stop: StopId) -> bool {
        self.by_stop.contains_key(&stop)
    }
}
