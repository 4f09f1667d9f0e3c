//! Fixed-point iteration of node activations.
//!
//! # Update rule
//!
//! For each node `j`, in index order, within one outer pass:
//!
//! ```text
//! V_j ← f(V_j + Σ_k V_k · W[k][j])
//! ```
//!
//! `f` is the [`Activation`] (logistic sigmoid by default).
//!
//! # Asynchronous order
//!
//! Updates happen in place on one shared vector. Node `j` sees the new
//! values of nodes `k < j` from the same pass and the previous values of
//! nodes `k > j`. This is Gauss-Seidel order, not a Jacobi snapshot, and
//! the numeric results depend on it.
//!
//! # Freezing
//!
//! A node whose update moves it by less than `epsilon` becomes
//! [`NodeState::Frozen`] and is skipped for the rest of the run, even if
//! its neighbours keep moving. States are created fresh for every run.
//!
//! # Termination
//!
//! At most `max_iterations` outer passes. Running out of budget is a normal
//! outcome, reported through [`ConvergenceReport::converged`].

use crate::activation::{Activation, Sigmoid};
use crate::config::FcmConfig;
use crate::error::{Error, Result};
use crate::map::CognitiveMap;
use crate::matrix::WeightMatrix;

/// Per-node state within a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Still recomputed each pass
    Active,
    /// Moved less than epsilon once; never recomputed again this run
    Frozen,
}

/// Something that happened during a run, in order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum ConvergenceEvent {
    /// Node `node` (0-based) was recomputed in outer pass `pass` (1-based)
    NodeUpdated {
        pass: usize,
        node: usize,
        old: f64,
        new: f64,
    },

    /// Node `node` froze after its update in `pass`
    NodeFrozen { pass: usize, node: usize },

    /// Every node froze by the end of `passes`
    Converged { passes: usize },

    /// The pass budget ran out with active nodes left
    BudgetExhausted { passes: usize },
}

impl ConvergenceEvent {
    /// Outer pass the event belongs to.
    pub fn pass(&self) -> usize {
        match self {
            ConvergenceEvent::NodeUpdated { pass, .. } => *pass,
            ConvergenceEvent::NodeFrozen { pass, .. } => *pass,
            ConvergenceEvent::Converged { passes } => *passes,
            ConvergenceEvent::BudgetExhausted { passes } => *passes,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceReport {
    /// Outer passes performed
    pub passes: usize,
    /// Whether every node froze
    pub converged: bool,
    /// Nodes frozen at the end
    pub frozen: usize,
    /// Nodes still active at the end
    pub active: usize,
}

/// Drives node values toward a fixed point.
#[derive(Debug, Clone)]
pub struct ConvergenceEngine<A = Sigmoid> {
    config: FcmConfig,
    activation: A,
}

impl ConvergenceEngine<Sigmoid> {
    /// Engine with the logistic sigmoid.
    pub fn new(config: FcmConfig) -> Self {
        Self::with_activation(config, Sigmoid)
    }
}

impl<A: Activation> ConvergenceEngine<A> {
    /// Engine with a custom activation.
    pub fn with_activation(config: FcmConfig, activation: A) -> Self {
        Self { config, activation }
    }

    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    /// Run to convergence or budget exhaustion, mutating the map's values.
    ///
    /// The updated values are read back through [`CognitiveMap::values`];
    /// the return value only describes how the run ended.
    pub fn run(&self, map: &mut CognitiveMap) -> ConvergenceReport {
        self.run_observed(map, |_| {})
    }

    /// Same as [`run`](Self::run), reporting each step to `observer`.
    pub fn run_observed<O>(&self, map: &mut CognitiveMap, observer: O) -> ConvergenceReport
    where
        O: FnMut(ConvergenceEvent),
    {
        let (weights, values) = map.parts_mut();
        self.iterate(weights, values, observer)
    }

    /// Run against a bare value slice.
    ///
    /// Fails only if `values` does not have one entry per node.
    pub fn run_in_place(
        &self,
        weights: &WeightMatrix,
        values: &mut [f64],
    ) -> Result<ConvergenceReport> {
        if weights.len() != values.len() {
            return Err(Error::DimensionMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }
        Ok(self.iterate(weights, values, |_| {}))
    }

    fn iterate<O>(
        &self,
        weights: &WeightMatrix,
        values: &mut [f64],
        mut observer: O,
    ) -> ConvergenceReport
    where
        O: FnMut(ConvergenceEvent),
    {
        let n = weights.len();
        let epsilon = self.config.epsilon;
        let mut states = vec![NodeState::Active; n];
        let mut frozen = 0;
        let mut passes = 0;

        while passes < self.config.max_iterations {
            passes += 1;

            for j in 0..n {
                if states[j] == NodeState::Frozen {
                    continue;
                }

                let old = values[j];
                // Live vector: k < j already updated this pass
                let total: f64 = values
                    .iter()
                    .zip(weights.column(j))
                    .map(|(v, w)| v * w)
                    .sum();
                let new = self.activation.activate(old + total);
                values[j] = new;

                observer(ConvergenceEvent::NodeUpdated {
                    pass: passes,
                    node: j,
                    old,
                    new,
                });

                if (new - old).abs() < epsilon {
                    states[j] = NodeState::Frozen;
                    frozen += 1;
                    observer(ConvergenceEvent::NodeFrozen { pass: passes, node: j });
                }
            }

            tracing::trace!(pass = passes, frozen, nodes = n, "outer pass complete");

            if frozen == n {
                break;
            }
        }

        let converged = frozen == n;
        if converged {
            tracing::info!(passes, nodes = n, "map converged");
            observer(ConvergenceEvent::Converged { passes });
        } else {
            tracing::warn!(
                passes,
                active = n - frozen,
                "pass budget exhausted before convergence"
            );
            observer(ConvergenceEvent::BudgetExhausted { passes });
        }

        ConvergenceReport {
            passes,
            converged,
            frozen,
            active: n - frozen,
        }
    }
}
