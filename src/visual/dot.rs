use super::{VisualGraph, VisualNodeKind, step_node_id};
use std::fmt;

/// Graphviz rendering of a [`VisualGraph`], mostly for debugging.
pub struct DisplayDot<'a> {
    pub graph: &'a VisualGraph,
}

impl VisualGraph {
    pub fn to_dot(&self) -> String {
        DisplayDot { graph: self }.to_string()
    }
}

impl fmt::Display for DisplayDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph steps {{")?;
        writeln!(f, "  rankdir=LR;")?;

        for cluster in &self.graph.clusters {
            writeln!(f, "  subgraph \"{}\" {{", escape(&format!("cluster_{}", cluster.id)))?;
            writeln!(f, "    label=\"{}\";", escape(&cluster.id))?;
            for step_id in &cluster.step_ids {
                writeln!(f, "    \"{}\";", escape(&step_node_id(step_id)))?;
            }
            writeln!(f, "  }}")?;
        }

        for node in &self.graph.nodes {
            let shape = match node.kind {
                VisualNodeKind::Step => "box",
                VisualNodeKind::Parameter => "invhouse",
                VisualNodeKind::Output => "house",
            };
            let label = match &node.type_label {
                Some(type_label) => format!("{}\\n{}", escape(&node.label), escape(type_label)),
                None => escape(&node.label),
            };
            writeln!(
                f,
                "  \"{}\" [shape={}, label=\"{}\"];",
                escape(&node.id),
                shape,
                label
            )?;
            if node.kind != VisualNodeKind::Step {
                writeln!(
                    f,
                    "  \"{}\" -> \"{}\" [style=dotted, arrowhead=none];",
                    escape(&step_node_id(&node.step_id)),
                    escape(&node.id)
                )?;
            }
        }

        for edge in &self.graph.edges {
            writeln!(
                f,
                "  \"{}\" -> \"{}\" [label=\"{}\", color=\"{}\", penwidth={:.2}{}];",
                escape(&edge.source),
                escape(&edge.target),
                escape(&edge.label),
                edge.style.color,
                edge.style.width,
                if edge.style.dashed { ", style=dashed" } else { "" }
            )?;
        }

        writeln!(f, "}}")
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
