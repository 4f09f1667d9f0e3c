//! Engine configuration.
//!
//! Replaces module-level constants with one value passed to the generator
//! and the convergence engine at construction time.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Smallest map the generator produces by default.
pub const DEFAULT_MIN_NODES: usize = 3;

/// Upper node bound; exclusive by default.
pub const DEFAULT_MAX_NODES: usize = 10;

/// Outer pass budget for one convergence run.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Per-node change below which a node freezes.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Whether `max_nodes` is itself an admissible size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeBound {
    /// `min_nodes ..= max_nodes`
    Inclusive,
    /// `min_nodes .. max_nodes`
    #[default]
    Exclusive,
}

/// Configuration shared by [`MatrixGenerator`](crate::MatrixGenerator) and
/// [`ConvergenceEngine`](crate::ConvergenceEngine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FcmConfig {
    /// Smallest generated node count
    pub min_nodes: usize,
    /// Largest generated node count, see `upper_bound`
    pub max_nodes: usize,
    /// Whether `max_nodes` is included in the range
    pub upper_bound: NodeBound,
    /// Outer pass budget
    pub max_iterations: usize,
    /// Freeze threshold for a single node update
    pub epsilon: f64,
    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            min_nodes: DEFAULT_MIN_NODES,
            max_nodes: DEFAULT_MAX_NODES,
            upper_bound: NodeBound::Exclusive,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_EPSILON,
            seed: None,
        }
    }
}

impl FcmConfig {
    /// Create config from `FCM_*` environment variables with defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    ///
    /// Recognised keys: `FCM_MIN_NODES`, `FCM_MAX_NODES`, `FCM_MAX_INCLUSIVE`,
    /// `FCM_MAX_ITERATIONS`, `FCM_EPSILON`, `FCM_SEED`.
    ///
    /// `FCM_MAX_INCLUSIVE` takes `true`/`false`, `1`/`0`, `yes`/`no` or
    /// `on`/`off`, case-insensitive.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "FCM_MIN_NODES")? {
            config.min_nodes = v;
        }
        if let Some(v) = parse_var(&lookup, "FCM_MAX_NODES")? {
            config.max_nodes = v;
        }
        if let Some(Flag(inclusive)) = parse_var(&lookup, "FCM_MAX_INCLUSIVE")? {
            config.upper_bound = if inclusive {
                NodeBound::Inclusive
            } else {
                NodeBound::Exclusive
            };
        }
        if let Some(v) = parse_var(&lookup, "FCM_MAX_ITERATIONS")? {
            config.max_iterations = v;
        }
        if let Some(v) = parse_var(&lookup, "FCM_EPSILON")? {
            config.epsilon = v;
        }
        config.seed = parse_var(&lookup, "FCM_SEED")?;

        config.validate()?;
        Ok(config)
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the outer pass budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the freeze threshold.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the generated node range.
    #[must_use]
    pub fn with_node_range(mut self, min: usize, max: usize, upper_bound: NodeBound) -> Self {
        self.min_nodes = min;
        self.max_nodes = max;
        self.upper_bound = upper_bound;
        self
    }

    /// Admissible node counts as an inclusive range.
    ///
    /// Empty (`start > end`) when an exclusive bound leaves no room.
    pub fn node_range(&self) -> RangeInclusive<usize> {
        match self.upper_bound {
            NodeBound::Inclusive => self.min_nodes..=self.max_nodes,
            NodeBound::Exclusive => {
                if self.max_nodes == 0 {
                    // 1..=0 is empty
                    1..=0
                } else {
                    self.min_nodes..=self.max_nodes - 1
                }
            }
        }
    }

    /// Check whether `n` may be generated.
    pub fn contains(&self, n: usize) -> bool {
        self.node_range().contains(&n)
    }

    /// Reject `n` with [`Error::InvalidDimension`] when outside the range.
    pub fn check_dimension(&self, n: usize) -> Result<()> {
        if self.contains(n) {
            Ok(())
        } else {
            Err(Error::InvalidDimension {
                n,
                min: self.min_nodes,
                max: self.max_nodes,
                inclusive: self.upper_bound == NodeBound::Inclusive,
            })
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_nodes == 0 {
            return Err(Error::InvalidConfig("min_nodes must be at least 1".into()));
        }
        if self.node_range().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "node range {}..{} ({:?}) is empty",
                self.min_nodes, self.max_nodes, self.upper_bound
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be at least 1".into()));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Boolean environment value.
struct Flag(bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Flag(true)),
            "false" | "0" | "no" | "off" => Ok(Flag(false)),
            _ => Err("expected true/false, 1/0, yes/no or on/off".to_string()),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
