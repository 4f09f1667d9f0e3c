//! The instantaneous state of a fuzzy cognitive map.

use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::matrix::WeightMatrix;

/// One activation value per node.
///
/// Positional access through `Deref` is 0-based. The editor methods
/// [`node`](Self::node) and [`set_node`](Self::set_node) take the 1-based
/// index shown to users.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueVector(Vec<f64>);

impl ValueVector {
    /// Wrap raw values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Value of node `index` (1-based).
    pub fn node(&self, index: usize) -> Result<f64> {
        let slot = self.slot(index)?;
        Ok(self.0[slot])
    }

    /// Overwrite node `index` (1-based).
    ///
    /// Rejects index 0 and indices past the last node with
    /// [`Error::IndexOutOfRange`], and non-finite values.
    pub fn set_node(&mut self, index: usize, value: f64) -> Result<()> {
        let slot = self.slot(index)?;
        if !value.is_finite() {
            return Err(Error::NonFinite { what: "node value" });
        }
        self.0[slot] = value;
        Ok(())
    }

    /// Unwrap into the raw values.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    fn slot(&self, index: usize) -> Result<usize> {
        if index == 0 || index > self.0.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }
        Ok(index - 1)
    }
}

impl From<Vec<f64>> for ValueVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Deref for ValueVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for ValueVector {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

/// Weight matrix and value vector of matching size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMap"))]
pub struct CognitiveMap {
    weights: WeightMatrix,
    values: ValueVector,
}

/// Unchecked wire form of a [`CognitiveMap`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMap {
    weights: WeightMatrix,
    values: ValueVector,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMap> for CognitiveMap {
    type Error = Error;

    fn try_from(raw: RawMap) -> Result<Self> {
        Self::new(raw.weights, raw.values)
    }
}

impl CognitiveMap {
    /// Pair a matrix with a value vector.
    pub fn new(weights: WeightMatrix, values: impl Into<ValueVector>) -> Result<Self> {
        let values = values.into();
        if weights.len() != values.len() {
            return Err(Error::DimensionMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }
        Ok(Self { weights, values })
    }

    /// Number of concept nodes.
    pub fn node_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    pub fn values(&self) -> &ValueVector {
        &self.values
    }

    /// Split borrow for the engine: read weights while writing values.
    pub(crate) fn parts_mut(&mut self) -> (&WeightMatrix, &mut ValueVector) {
        (&self.weights, &mut self.values)
    }

    /// Node editor: set node `index` (1-based) to `value`.
    pub fn edit_node(&mut self, index: usize, value: f64) -> Result<()> {
        self.values.set_node(index, value)?;
        tracing::debug!(index, value, "node edited");
        Ok(())
    }

    /// Edge editor: set the weight of `src → dst` (0-based).
    pub fn edit_edge(&mut self, src: usize, dst: usize, weight: f64) -> Result<()> {
        self.weights.set_edge(src, dst, weight)?;
        tracing::debug!(src, dst, weight, "edge edited");
        Ok(())
    }

    /// Take the matrix and vector back.
    pub fn into_parts(self) -> (WeightMatrix, ValueVector) {
        (self.weights, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_indices_are_one_based() {
        let values = ValueVector::new(vec![0.1, 0.2, 0.3]);
        assert_eq!(values.node(1), Ok(0.1));
        assert_eq!(values.node(3), Ok(0.3));
        assert_eq!(values[0], 0.1);
    }

    #[test]
    fn node_index_zero_rejected() {
        let mut values = ValueVector::new(vec![0.1, 0.2]);
        assert_eq!(
            values.set_node(0, 0.9),
            Err(Error::IndexOutOfRange { index: 0, len: 2 })
        );
        assert_eq!(&*values, &[0.1, 0.2]);
    }

    #[test]
    fn node_index_past_end_rejected() {
        let mut values = ValueVector::new(vec![0.1, 0.2]);
        assert_eq!(
            values.set_node(3, 0.9),
            Err(Error::IndexOutOfRange { index: 3, len: 2 })
        );
        assert_eq!(&*values, &[0.1, 0.2]);
    }

    #[test]
    fn node_value_must_be_finite() {
        let mut values = ValueVector::new(vec![0.1]);
        assert!(values.set_node(1, f64::NAN).is_err());
        assert_eq!(values[0], 0.1);
    }

    #[test]
    fn map_requires_matching_dimensions() {
        let err = CognitiveMap::new(WeightMatrix::zeros(3), vec![0.5, 0.5]).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { weights: 3, values: 2 });
    }

    #[test]
    fn map_editors_apply_in_place() {
        let mut map = CognitiveMap::new(WeightMatrix::zeros(3), vec![0.0; 3]).unwrap();
        map.edit_node(2, 0.75).unwrap();
        map.edit_edge(0, 2, -0.5).unwrap();

        assert_eq!(map.values()[1], 0.75);
        assert_eq!(map.weights().get(0, 2), -0.5);
        assert!(map.edit_node(4, 0.1).is_err());
        assert!(map.edit_edge(0, 3, 0.1).is_err());
    }

    #[test]
    fn into_parts_returns_edited_state() {
        let mut map = CognitiveMap::new(WeightMatrix::zeros(2), vec![0.2, 0.4]).unwrap();
        map.edit_edge(1, 0, 0.3).unwrap();

        let (weights, values) = map.into_parts();
        assert_eq!(weights.get(1, 0), 0.3);
        assert_eq!(values.into_inner(), vec![0.2, 0.4]);
    }

    #[cfg(feature = "serde")]
    mod serde_format {
        use super::*;

        #[test]
        fn map_round_trips() {
            let mut map = CognitiveMap::new(WeightMatrix::zeros(2), vec![0.25, 0.5]).unwrap();
            map.edit_edge(0, 1, -0.5).unwrap();

            let json = serde_json::to_string(&map).unwrap();
            assert_eq!(
                json,
                r#"{"weights":[[0.0,-0.5],[0.0,0.0]],"values":[0.25,0.5]}"#
            );
            assert_eq!(serde_json::from_str::<CognitiveMap>(&json).unwrap(), map);
        }

        #[test]
        fn mismatched_values_are_rejected() {
            let json = r#"{"weights":[[0,0.5,0],[0,0,0],[0,0,0]],"values":[0.1,0.2]}"#;
            let err = serde_json::from_str::<CognitiveMap>(json).unwrap_err();
            assert!(
                err.to_string().contains("3x3 weights, 2 values"),
                "{err}"
            );
        }

        #[test]
        fn deserialized_map_converges() {
            let json = r#"{"weights":[[0.9,0.5],[0.3,0.7]],"values":[0.1,0.2]}"#;
            let mut map: CognitiveMap = serde_json::from_str(json).unwrap();
            assert!(map.weights().has_zero_diagonal());

            let report = crate::ConvergenceEngine::new(crate::FcmConfig::default()).run(&mut map);
            assert!(report.passes >= 1);
            assert_eq!(map.values().len(), 2);
        }
    }
}
