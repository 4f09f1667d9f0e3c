//! Fuzzy Cognitive Map Engine
//!
//! A fuzzy cognitive map is a weighted directed graph of concepts. Each
//! concept carries an activation value; each edge carries a signed
//! influence in `[-1, 1]`. Repeatedly squashing every node's value plus
//! its weighted inputs drives the map toward a fixed point.
//!
//! # Pipeline
//!
//! ```text
//! MatrixGenerator → WeightMatrix ─┐
//!                                 ├→ ConvergenceEngine (Activation) → ValueVector
//!            initial ValueVector ─┘
//! ```
//!
//! Editors and visualizers read or mutate the map between runs, never
//! during one.
//!
//! # Usage
//!
//! ```
//! use fuzzmap_core::{CognitiveMap, ConvergenceEngine, FcmConfig, WeightMatrix};
//!
//! let weights = WeightMatrix::from_rows(vec![
//!     vec![0.0, 0.6],
//!     vec![-0.4, 0.0],
//! ]).unwrap();
//! let mut map = CognitiveMap::new(weights, vec![0.3, 0.7]).unwrap();
//!
//! let report = ConvergenceEngine::new(FcmConfig::default()).run(&mut map);
//! assert!(report.passes <= 100);
//! ```

mod activation;
mod config;
mod convergence;
mod error;
mod map;
mod matrix;
mod simulation;

pub use activation::{sigmoid, Activation, Sigmoid};
pub use config::{
    FcmConfig, NodeBound, DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_NODES,
    DEFAULT_MIN_NODES,
};
pub use convergence::{ConvergenceEngine, ConvergenceEvent, ConvergenceReport, NodeState};
pub use error::{Error, Result};
pub use map::{CognitiveMap, ValueVector};
pub use matrix::{MatrixGenerator, WeightMatrix, WEIGHT_MAX, WEIGHT_MIN};
pub use simulation::Simulation;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_form_a_valid_range() {
        assert!(DEFAULT_MIN_NODES < DEFAULT_MAX_NODES);
        assert!(DEFAULT_EPSILON > 0.0);
        assert_eq!(DEFAULT_MAX_ITERATIONS, 100);
    }

    #[test]
    fn generated_map_converges_within_budget() {
        let mut gen = MatrixGenerator::new(FcmConfig::default().with_seed(2024));
        let n = gen.random_size().unwrap();
        let weights = gen.generate(n);
        let values = gen.random_values(n);
        let mut map = CognitiveMap::new(weights, values).unwrap();

        let report = ConvergenceEngine::new(FcmConfig::default()).run(&mut map);
        assert!(report.passes <= DEFAULT_MAX_ITERATIONS);
        assert_eq!(report.frozen + report.active, n);
    }
}
