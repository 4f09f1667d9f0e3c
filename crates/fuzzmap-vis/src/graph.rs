//! Read-only graph view over a weight matrix.

use fuzzmap_core::WeightMatrix;
use serde::{Deserialize, Serialize};

/// Round to two decimal places for display.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A directed, labelled edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub source: usize,
    pub target: usize,
    /// Exact weight
    pub weight: f64,
    /// Weight rounded to two decimals
    pub label: f64,
}

/// Nodes `0..n` and one edge per non-zero matrix cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphView {
    pub node_count: usize,
    pub edges: Vec<EdgeLabel>,
}

impl GraphView {
    /// Build the view. Zero weights produce no edge.
    pub fn from_matrix(weights: &WeightMatrix) -> Self {
        let edges = weights
            .edges()
            .map(|(source, target, weight)| EdgeLabel {
                source,
                target,
                weight,
                label: round2(weight),
            })
            .collect();

        Self {
            node_count: weights.len(),
            edges,
        }
    }

    /// Edges leaving `node`.
    pub fn outgoing(&self, node: usize) -> impl Iterator<Item = &EdgeLabel> {
        self.edges.iter().filter(move |e| e.source == node)
    }

    /// Edges entering `node`.
    pub fn incoming(&self, node: usize) -> impl Iterator<Item = &EdgeLabel> {
        self.edges.iter().filter(move |e| e.target == node)
    }
}
