//! Weight matrix and its random generator.
//!
//! `weights[src][dst]` is the signed influence of node `src` on node `dst`.
//! The diagonal is always zero: a concept never influences itself.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FcmConfig;
use crate::error::{Error, Result};

/// Lower bound of a generated weight.
pub const WEIGHT_MIN: f64 = -1.0;

/// Upper bound of a generated weight.
pub const WEIGHT_MAX: f64 = 1.0;

/// Dense `n × n` directed weight matrix, row-major.
///
/// With the `serde` feature it serializes as a list of rows and
/// deserializes through [`from_rows`](Self::from_rows).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<Vec<f64>>", try_from = "Vec<Vec<f64>>")
)]
pub struct WeightMatrix {
    n: usize,
    data: Vec<f64>,
}

impl WeightMatrix {
    /// A matrix with no edges.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Build a matrix from rows.
    ///
    /// Every row must have `rows.len()` entries and every entry must be
    /// finite. Diagonal entries are forced to zero.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(Error::NonFinite { what: "weight" });
            }
            data.extend(row);
            data[i * n + i] = 0.0;
        }

        Ok(Self { n, data })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix has zero nodes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Weight of edge `src → dst`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= len()`. Use [`try_get`](Self::try_get)
    /// for unchecked input.
    #[inline]
    pub fn get(&self, src: usize, dst: usize) -> f64 {
        assert!(src < self.n && dst < self.n, "edge ({src}, {dst}) outside {0}x{0}", self.n);
        self.data[src * self.n + dst]
    }

    /// Weight of edge `src → dst`, rejecting indices outside the matrix.
    pub fn try_get(&self, src: usize, dst: usize) -> Result<f64> {
        self.check_index(src)?;
        self.check_index(dst)?;
        Ok(self.data[src * self.n + dst])
    }

    /// Overwrite edge `src → dst` (0-based).
    ///
    /// This is the edge editor boundary: indices are bounds-checked, the
    /// diagonal is protected and the weight must be finite.
    pub fn set_edge(&mut self, src: usize, dst: usize, weight: f64) -> Result<()> {
        self.check_index(src)?;
        self.check_index(dst)?;
        if src == dst {
            return Err(Error::SelfLoop { node: src });
        }
        if !weight.is_finite() {
            return Err(Error::NonFinite { what: "weight" });
        }
        self.data[src * self.n + dst] = weight;
        Ok(())
    }

    /// Outgoing weights of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src >= len()`.
    pub fn row(&self, src: usize) -> &[f64] {
        &self.data[src * self.n..(src + 1) * self.n]
    }

    /// Incoming weights of `dst`, indexed by source.
    ///
    /// # Panics
    ///
    /// The iterator panics if `dst >= len()`.
    pub fn column(&self, dst: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n).map(move |src| self.data[src * self.n + dst])
    }

    /// All rows as owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.n.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// Non-zero directed edges as `(src, dst, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(move |(i, w)| (i / self.n, i % self.n, *w))
    }

    /// Whether every diagonal entry is exactly zero.
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.n).all(|i| self.data[i * self.n + i] == 0.0)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.n {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.n,
            })
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for WeightMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<WeightMatrix> for Vec<Vec<f64>> {
    fn from(matrix: WeightMatrix) -> Self {
        matrix.to_rows()
    }
}

impl std::fmt::Display for WeightMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.n == 0 {
            return write!(f, "[]");
        }
        for (i, row) in self.data.chunks(self.n).enumerate() {
            f.write_str(if i == 0 { "[[" } else { " [" })?;
            for (j, w) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{w:>8.4}")?;
            }
            f.write_str("]")?;
            if i + 1 < self.n {
                f.write_str("\n")?;
            }
        }
        f.write_str("]")
    }
}

/// Random source for weight matrices and initial activations.
pub struct MatrixGenerator {
    config: FcmConfig,
    rng: StdRng,
}

impl MatrixGenerator {
    /// Create a generator seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: FcmConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// The configuration this generator enforces.
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    /// Sample an `n × n` matrix with uniform `[-1, 1]` weights and a zero diagonal.
    ///
    /// No range check is applied; see [`generate_checked`](Self::generate_checked).
    pub fn generate(&mut self, n: usize) -> WeightMatrix {
        let dist = Uniform::new_inclusive(WEIGHT_MIN, WEIGHT_MAX);
        let mut data: Vec<f64> = (0..n * n).map(|_| dist.sample(&mut self.rng)).collect();
        for i in 0..n {
            data[i * n + i] = 0.0;
        }

        let matrix = WeightMatrix { n, data };
        tracing::debug!(n, "generated weight matrix\n{matrix}");
        matrix
    }

    /// Like [`generate`](Self::generate) but rejects `n` outside the configured range.
    pub fn generate_checked(&mut self, n: usize) -> Result<WeightMatrix> {
        self.config.check_dimension(n)?;
        Ok(self.generate(n))
    }

    /// Draw a node count uniformly from the configured range.
    pub fn random_size(&mut self) -> Result<usize> {
        self.config.validate()?;
        Ok(self.rng.gen_range(self.config.node_range()))
    }

    /// Draw `n` initial activations uniformly from `[0, 1)`.
    pub fn random_values(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.rng.gen::<f64>()).collect()
    }
}
