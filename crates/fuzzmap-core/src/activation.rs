//! Squashing functions applied to a node's raw input.

/// Logistic sigmoid: `1 / (1 + e^(-x))`.
///
/// Monotonically increasing with `sigmoid(0) == 0.5`. The mathematical
/// range is `(0, 1)`; in `f64` the result rounds to exactly `1.0` above
/// `x ≈ 36.7` and to `0.0` below `x ≈ -709.8` where `e^(-x)` overflows.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A stateless activation function.
pub trait Activation {
    /// Map a raw node input to its new activation value.
    fn activate(&self, x: f64) -> f64;
}

/// The logistic sigmoid as an [`Activation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    #[inline]
    fn activate(&self, x: f64) -> f64 {
        sigmoid(x)
    }
}
