// Metrics polled from Canvas and the keyed result of one poll cycle
use crate::domain::assignment::MissingAssignment;
use crate::domain::course::Course;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MissingAssignments,
    Courses,
}

impl Metric {
    /// Poll order
    pub const ALL: [Metric; 2] = [Metric::MissingAssignments, Metric::Courses];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::MissingAssignments => "missing_assignments",
            Metric::Courses => "courses",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

/// Records fetched for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricData {
    MissingAssignments(Vec<MissingAssignment>),
    Courses(Vec<Course>),
}

impl MetricData {
    pub fn len(&self) -> usize {
        match self {
            MetricData::MissingAssignments(items) => items.len(),
            MetricData::Courses(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a complete poll cycle. Only fetched metrics have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollResult(BTreeMap<Metric, MetricData>);

impl PollResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, data: MetricData) {
        self.0.insert(metric, data);
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricData> {
        self.0.get(&metric)
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(&metric)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
