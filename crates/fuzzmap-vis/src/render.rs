//! Text renderings of a map: Graphviz DOT, a terminal table and JSON.

use fuzzmap_core::CognitiveMap;
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeLabel, GraphView};
use crate::layout::{spring_layout, LayoutConfig, Position};

/// Graphviz `digraph` with two-decimal edge labels.
///
/// When `values` is given, node labels carry the activation value too.
pub fn render_dot(graph: &GraphView, values: Option<&[f64]>) -> String {
    let mut out = String::from("digraph fcm {\n");

    for node in 0..graph.node_count {
        let line = match values.and_then(|v| v.get(node)) {
            Some(value) => format!("    {node} [label=\"{node}\\n{value:.4}\"];\n"),
            None => format!("    {node};\n"),
        };
        out.push_str(&line);
    }

    for edge in &graph.edges {
        out.push_str(&format!(
            "    {} -> {} [label=\"{:.2}\"];\n",
            edge.source, edge.target, edge.label
        ));
    }

    out.push_str("}\n");
    out
}

/// One line per edge, `source -> target : label`.
pub fn render_table(graph: &GraphView) -> String {
    if graph.edges.is_empty() {
        return String::from("(no edges)\n");
    }

    graph
        .edges
        .iter()
        .map(|edge| {
            format!(
                "{:>3} -> {:<3} : {:>5.2}\n",
                edge.source, edge.target, edge.label
            )
        })
        .collect()
}

/// Node state for JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: usize,
    pub value: f64,
    pub position: Position,
}

/// Everything a frontend needs to draw the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeLabel>,
}

impl GraphSnapshot {
    /// Capture the map with a spring layout.
    pub fn capture(map: &CognitiveMap, layout: &LayoutConfig) -> Self {
        let graph = GraphView::from_matrix(map.weights());
        let positions = spring_layout(&graph, layout);

        let nodes = map
            .values()
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(id, (&value, position))| NodeSnapshot {
                id,
                value,
                position,
            })
            .collect();

        Self {
            nodes,
            edges: graph.edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
