//! Presentation graph for rendering layers.
//!
//! Nothing here affects validation. The builder reads the step graph, the
//! catalog and the connection list, and produces nodes, styled edges and
//! connected-component clusters.

mod dot;

use crate::analysis::Connection;
use crate::catalog::Catalog;
use crate::graph::StepGraph;
use crate::types::ValueType;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::VecDeque;

const COMPATIBLE_COLOR: &str = "#22c55e";
const CONVERTIBLE_COLOR: &str = "#f59e0b";
const INCOMPATIBLE_COLOR: &str = "#ef4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualNodeKind {
    Step,
    Parameter,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub kind: VisualNodeKind,
    pub label: String,
    pub step_id: String,
    /// Step type tag for step nodes, value type name otherwise.
    pub type_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub color: String,
    pub width: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub compatible: bool,
    pub strength: f64,
    pub style: EdgeStyle,
}

/// A connected component of at least two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualCluster {
    pub id: String,
    pub step_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub clusters: Vec<VisualCluster>,
}

impl VisualGraph {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn cluster_of(&self, step_id: &str) -> Option<&VisualCluster> {
        self.clusters
            .iter()
            .find(|c| c.step_ids.iter().any(|s| s == step_id))
    }
}

pub fn step_node_id(step_id: &str) -> String {
    format!("step:{}", step_id)
}

pub fn parameter_node_id(step_id: &str, parameter: &str) -> String {
    format!("param:{}.{}", step_id, parameter)
}

pub fn output_node_id(step_id: &str, output: &str) -> String {
    format!("output:{}.{}", step_id, output)
}

/// Projects a graph and its connections into a renderable node/edge graph.
///
/// Steps with an unknown type fall back to their own parameter definitions
/// and contribute no output nodes.
pub fn build_visual_graph(
    graph: &StepGraph,
    catalog: &Catalog,
    connections: &[Connection],
) -> VisualGraph {
    let mut nodes = Vec::new();

    for step in graph.unique_steps() {
        nodes.push(VisualNode {
            id: step_node_id(&step.id),
            kind: VisualNodeKind::Step,
            label: step.id.clone(),
            step_id: step.id.clone(),
            type_label: Some(step.step_type.clone()),
        });

        match catalog.get(&step.step_type) {
            Some(schema) => {
                for param in &schema.parameters {
                    nodes.push(parameter_node(&step.id, &param.name, &param.value_type));
                }
                for output in &schema.outputs {
                    nodes.push(VisualNode {
                        id: output_node_id(&step.id, &output.name),
                        kind: VisualNodeKind::Output,
                        label: output.name.clone(),
                        step_id: step.id.clone(),
                        type_label: Some(output.value_type.to_string()),
                    });
                }
            }
            None => {
                for param in &step.parameters {
                    nodes.push(parameter_node(
                        &step.id,
                        &param.name,
                        &ValueType::parse(&param.value_type),
                    ));
                }
            }
        }
    }

    let edges = connections.iter().map(visual_edge).collect();
    let clusters = cluster_steps(graph, connections);

    VisualGraph {
        nodes,
        edges,
        clusters,
    }
}

fn parameter_node(step_id: &str, name: &str, value_type: &ValueType) -> VisualNode {
    VisualNode {
        id: parameter_node_id(step_id, name),
        kind: VisualNodeKind::Parameter,
        label: name.to_string(),
        step_id: step_id.to_string(),
        type_label: Some(value_type.to_string()),
    }
}

fn visual_edge(connection: &Connection) -> VisualEdge {
    let convertible = !connection.compatible && connection.strength > 0.0;
    let color = if connection.compatible {
        COMPATIBLE_COLOR
    } else if convertible {
        CONVERTIBLE_COLOR
    } else {
        INCOMPATIBLE_COLOR
    };

    VisualEdge {
        id: connection.id.clone(),
        source: output_node_id(&connection.source_step_id, &connection.source_output),
        target: parameter_node_id(&connection.target_step_id, &connection.target_parameter),
        label: if connection.compatible {
            connection.source_type.to_string()
        } else {
            format!("{} -> {}", connection.source_type, connection.target_type)
        },
        compatible: connection.compatible,
        strength: connection.strength,
        style: EdgeStyle {
            color: color.to_string(),
            width: 1.0 + 2.0 * connection.strength,
            dashed: !connection.compatible,
        },
    }
}

/// Groups steps into connected components over the undirected connection adjacency.
fn cluster_steps(graph: &StepGraph, connections: &[Connection]) -> Vec<VisualCluster> {
    let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for connection in connections {
        let (source, target) = (
            connection.source_step_id.as_str(),
            connection.target_step_id.as_str(),
        );
        if source == target {
            continue;
        }
        adjacency.entry(source).or_default().push(target);
        adjacency.entry(target).or_default().push(source);
    }

    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut clusters = Vec::new();

    for start in graph.step_ids() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = vec![start.to_string()];
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(current).into_iter().flatten() {
                if seen.insert(next) {
                    component.push(next.to_string());
                    queue.push_back(next);
                }
            }
        }
        if component.len() > 1 {
            clusters.push(VisualCluster {
                id: format!("cluster-{}", clusters.len()),
                step_ids: component,
            });
        }
    }

    clusters
}
