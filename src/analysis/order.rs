use super::dependency::DependencyMap;
use crate::graph::StepGraph;
use ahash::AHashSet;

/// Produces an execution order where every step follows its dependencies.
///
/// Depth-first post-order over `depends_on`. A step met again while it is
/// still being visited is skipped, so cyclic graphs still get a total order;
/// callers must consult the cycle detector to know whether it is sound.
/// Every step appears exactly once.
pub fn execution_order(graph: &StepGraph, map: &DependencyMap) -> Vec<String> {
    let mut sorter = TopologicalSorter {
        map,
        done: AHashSet::new(),
        in_progress: AHashSet::new(),
        order: Vec::with_capacity(map.len()),
    };
    for step in graph.unique_steps() {
        sorter.visit(&step.id);
    }
    sorter.order
}

struct TopologicalSorter<'a> {
    map: &'a DependencyMap,
    done: AHashSet<&'a str>,
    in_progress: AHashSet<&'a str>,
    order: Vec<String>,
}

impl<'a> TopologicalSorter<'a> {
    /// Post-order walk from `start` using `(node, next dependency index)` frames.
    fn visit(&mut self, start: &'a str) {
        if self.done.contains(start) || self.in_progress.contains(start) {
            return;
        }
        let map = self.map;
        self.in_progress.insert(start);
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
                    if !self.done.contains(dep) && !self.in_progress.contains(dep) {
                        self.in_progress.insert(dep);
                        frames.push((dep, 0));
                    }
                }
                None => {
                    frames.pop();
                    self.in_progress.remove(node);
                    self.done.insert(node);
                    self.order.push(node.to_string());
                }
            }
        }
    }
}

/// Whether the graph's declared order hint lists exactly the computed order.
///
/// `None` when the graph declares no hint.
pub fn hint_matches(graph: &StepGraph, order: &[String]) -> Option<bool> {
    if graph.execution_order.is_empty() {
        return None;
    }
    Some(graph.execution_order.as_slice() == order)
}
