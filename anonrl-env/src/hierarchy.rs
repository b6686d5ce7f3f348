//! Generalization hierarchy.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered sequence of increasingly coarse labels a raw value is mapped through.
///
/// Level `0` is the first generalization of the raw value, the last level is
/// the coarsest one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialHierarchy(Vec<String>);

impl SerialHierarchy {
    /// Constructs a hierarchy from its levels.
    pub fn new(levels: Vec<String>) -> Self {
        Self(levels)
    }

    /// Builds the chain of labels reachable from `start` by following `links`.
    ///
    /// `start` itself is not part of the hierarchy. The chain stops at the
    /// first label without a successor, or before a label already visited.
    pub fn from_links(start: &str, links: &HashMap<String, String>) -> Self {
        let mut levels: Vec<String> = vec![];
        let mut current = start;
        while let Some(next) = links.get(current) {
            if next == start || levels.contains(next) {
                break;
            }
            levels.push(next.clone());
            current = next;
        }
        Self(levels)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the hierarchy has no levels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label at the given level.
    pub fn get(&self, level: usize) -> Option<&str> {
        self.0.get(level).map(|s| s.as_str())
    }

    /// Coarsest label.
    pub fn top(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    /// Iterator over the levels, finest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

impl From<Vec<&str>> for SerialHierarchy {
    fn from(levels: Vec<&str>) -> Self {
        Self(levels.into_iter().map(String::from).collect())
    }
}
