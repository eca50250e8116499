use super::dependency::DependencyMap;
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Cycles of at most this many steps are reported as warnings.
pub const DEFAULT_WARNING_CYCLE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleSeverity {
    Warning,
    Error,
}

impl fmt::Display for CycleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleSeverity::Warning => write!(f, "warning"),
            CycleSeverity::Error => write!(f, "error"),
        }
    }
}

/// A dependency cycle. The first step is repeated at the end of `cycle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependency {
    pub cycle: Vec<String>,
    pub severity: CycleSeverity,
    pub suggestions: Vec<String>,
}

impl CircularDependency {
    /// Number of distinct steps in the cycle.
    pub fn len(&self) -> usize {
        self.cycle.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.cycle.iter().any(|s| s == step_id)
    }
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cycle.join(" -> "))
    }
}

/// Finds every cycle reachable through `depends_on` edges, using the default warning threshold.
pub fn detect(map: &DependencyMap) -> Vec<CircularDependency> {
    detect_with_threshold(map, DEFAULT_WARNING_CYCLE_LEN)
}

/// Finds every cycle; cycles with at most `warning_max_len` steps are warnings.
///
/// The search keeps going after a cycle is closed, so disjoint cycles are all
/// reported in one pass.
pub fn detect_with_threshold(map: &DependencyMap, warning_max_len: usize) -> Vec<CircularDependency> {
    let mut search = CycleSearch::new(map);
    for step_id in map.keys() {
        if !search.visited.contains(step_id.as_str()) {
            search.visit(step_id);
        }
    }

    search
        .cycles
        .into_iter()
        .map(|cycle| {
            let distinct = cycle.len().saturating_sub(1);
            let severity = if distinct <= warning_max_len {
                CycleSeverity::Warning
            } else {
                CycleSeverity::Error
            };
            let suggestions = break_suggestions(&cycle);
            debug!(cycle = %cycle.join(" -> "), %severity, "circular dependency detected");
            CircularDependency {
                cycle,
                severity,
                suggestions,
            }
        })
        .collect()
}

/// Three-colour depth-first search state.
struct CycleSearch<'a> {
    map: &'a DependencyMap,
    visited: AHashSet<&'a str>,
    on_stack: AHashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Vec<String>>,
}

impl<'a> CycleSearch<'a> {
    fn new(map: &'a DependencyMap) -> Self {
        Self {
            map,
            visited: AHashSet::new(),
            on_stack: AHashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    /// Depth-first walk from `start` with an explicit frame stack of
    /// `(node, index of the next dependency to follow)`.
    fn visit(&mut self, start: &'a str) {
        let map = self.map;
        self.enter(start);
        let mut frames: Vec<(&'a str, usize)> = vec![(start, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            let deps = map
                .get(node)
                .map(|record| record.depends_on.as_slice())
                .unwrap_or_default();

            match deps.get(next) {
                Some(dep) => {
                    frame.1 += 1;
                    let dep = dep.as_str();
                    if self.on_stack.contains(dep) {
                        self.close_cycle(dep);
                    } else if !self.visited.contains(dep) && map.contains_key(dep) {
                        self.enter(dep);
                        frames.push((dep, 0));
                    }
                }
                None => {
                    frames.pop();
                    self.path.pop();
                    self.on_stack.remove(node);
                }
            }
        }
    }

    fn enter(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);
    }

    fn close_cycle(&mut self, back_to: &str) {
        if let Some(start) = self.path.iter().position(|n| *n == back_to) {
            let mut cycle: Vec<String> = self.path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(back_to.to_string());
            self.cycles.push(cycle);
        }
    }
}

fn break_suggestions(cycle: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let [.., before_last, last] = cycle {
        suggestions.push(format!(
            "Remove the dependency between '{}' and '{}'",
            before_last, last
        ));
    }
    if cycle.len() == 4 {
        suggestions.push(format!(
            "Introduce an intermediate step to decouple '{}', '{}' and '{}'",
            cycle[0], cycle[1], cycle[2]
        ));
    }
    suggestions
}
