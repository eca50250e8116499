use super::dependency::DependencyMap;
use crate::graph::StepGraph;
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

/// Steps that cannot be reached from the graph's roots.
///
/// Roots are the declared root steps that exist in the graph. When there are
/// none and `infer_roots` is set, every step without dependencies is a root.
/// An empty root set means nothing is provably reachable, so every step is
/// returned. Reachability follows the inverse of `depends_on`.
pub fn find_orphans(graph: &StepGraph, map: &DependencyMap, infer_roots: bool) -> Vec<String> {
    let mut roots: Vec<&str> = graph
        .root_steps
        .iter()
        .map(String::as_str)
        .filter(|id| map.contains_key(*id))
        .collect();

    if roots.is_empty() && infer_roots {
        roots = map
            .values()
            .filter(|record| record.depends_on.is_empty())
            .map(|record| record.step_id.as_str())
            .collect();
    }

    if roots.is_empty() {
        return map.keys().cloned().collect();
    }

    let mut dependents: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for record in map.values() {
        for dep in &record.depends_on {
            dependents
                .entry(dep.as_str())
                .or_default()
                .push(record.step_id.as_str());
        }
    }

    let mut reached: AHashSet<&str> = AHashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for root in roots {
        if reached.insert(root) {
            queue.push_back(root);
        }
    }
    while let Some(current) = queue.pop_front() {
        for &next in dependents.get(current).into_iter().flatten() {
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    map.keys()
        .filter(|id| !reached.contains(id.as_str()))
        .cloned()
        .collect()
}
