//! A module for loading and thresholding connectivity weight datasets.
//!
//! A dataset directory holds a single `weights.json` file containing the row/column labels, the
//! weight matrix and the matching p-value matrix, row-major. Thresholding zeroes the entries
//! whose weight or p-value fails its cutoff and yields a boolean mask of the kept entries; the
//! result converts into a [`Graph`] keyed by the region labels.

use std::{fmt, fs::File, io::BufReader, path::Path};

use nalgebra::DMatrix;
use serde::Deserialize;

use crate::{edge::Edge, graph::Graph};

/// The dataset file name within a dataset directory.
pub const WEIGHTS_FILE: &str = "weights.json";

/// The reasons loading or validating a weight dataset can fail.
#[derive(Debug)]
pub enum WeightError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    NotSquare {
        rows: usize,
        row: usize,
        len: usize,
    },
    PvalueShapeMismatch,
    LabelCountMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}

impl std::error::Error for WeightError {}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "error reading dataset: {}", err),
            Self::Parse(err) => write!(f, "error parsing dataset: {}", err),
            Self::NotSquare { rows, row, len } => write!(
                f,
                "weight matrix is not square: has {} rows but row #{} has {} elements",
                rows, row, len
            ),
            Self::PvalueShapeMismatch => {
                write!(f, "p-value matrix doesn't match the weight matrix's shape")
            }
            Self::LabelCountMismatch {
                expected,
                rows,
                cols,
            } => write!(
                f,
                "expected {} row and column labels, got {} and {}",
                expected, rows, cols
            ),
        }
    }
}

impl From<std::io::Error> for WeightError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for WeightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// The on-disk form of a dataset.
#[derive(Debug, Deserialize)]
struct RawDataset {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    pvalues: Vec<Vec<f64>>,
}

/// A square connection-weight matrix with its p-value matrix and region labels.
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    weights: DMatrix<f64>,
    pvalues: DMatrix<f64>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl WeightMatrix {
    /// Loads a dataset from the `weights.json` file in the given directory.
    pub fn load(dir: &Path) -> Result<Self, WeightError> {
        let file = File::open(dir.join(WEIGHTS_FILE))?;
        let raw: RawDataset = serde_json::from_reader(BufReader::new(file))?;

        Self::from_rows(raw.row_labels, raw.col_labels, raw.weights, raw.pvalues)
    }

    /// Builds a dataset from row-major weight and p-value matrices.
    pub fn from_rows(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        weights: Vec<Vec<f64>>,
        pvalues: Vec<Vec<f64>>,
    ) -> Result<Self, WeightError> {
        let n = weights.len();

        if let Some((row, len)) = weights
            .iter()
            .enumerate()
            .find_map(|(i, row)| (row.len() != n).then(|| (i, row.len())))
        {
            return Err(WeightError::NotSquare { rows: n, row, len });
        }

        if pvalues.len() != n || pvalues.iter().any(|row| row.len() != n) {
            return Err(WeightError::PvalueShapeMismatch);
        }

        if row_labels.len() != n || col_labels.len() != n {
            return Err(WeightError::LabelCountMismatch {
                expected: n,
                rows: row_labels.len(),
                cols: col_labels.len(),
            });
        }

        Ok(Self {
            weights: DMatrix::from_fn(n, n, |i, j| weights[i][j]),
            pvalues: DMatrix::from_fn(n, n, |i, j| pvalues[i][j]),
            row_labels,
            col_labels,
        })
    }

    /// Returns the weight matrix.
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// Returns the p-value matrix.
    pub fn pvalues(&self) -> &DMatrix<f64> {
        &self.pvalues
    }

    /// Returns the row labels.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Returns the column labels.
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Returns the matrix dimension.
    pub fn len(&self) -> usize {
        self.row_labels.len()
    }

    /// Returns whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Thresholds the dataset: an entry is kept when its p-value is below `p_th` and its weight
    /// is above `w_th`; every other entry, and the diagonal, is zeroed.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::weights::WeightMatrix;
    ///
    /// let labels = vec!["a".into(), "b".into()];
    /// let dataset = WeightMatrix::from_rows(
    ///     labels.clone(),
    ///     labels,
    ///     vec![vec![9.0, 0.5], vec![0.4, 9.0]],
    ///     vec![vec![0.0, 0.001], vec![0.5, 0.0]],
    /// )
    /// .unwrap();
    ///
    /// let net = dataset.threshold(0.01, 0.0);
    ///
    /// // The diagonal is zeroed and (1, 0) fails the p-value cutoff.
    /// assert_eq!(net.weights()[(0, 1)], 0.5);
    /// assert_eq!(net.weights()[(1, 0)], 0.0);
    /// assert_eq!(net.weights()[(0, 0)], 0.0);
    /// ```
    pub fn threshold(&self, p_th: f64, w_th: f64) -> Thresholded {
        let n = self.len();

        let mask = DMatrix::from_fn(n, n, |i, j| {
            i != j && self.pvalues[(i, j)] < p_th && self.weights[(i, j)] > w_th
        });
        let weights = DMatrix::from_fn(n, n, |i, j| {
            if mask[(i, j)] {
                self.weights[(i, j)]
            } else {
                0.0
            }
        });

        Thresholded {
            weights,
            mask,
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
        }
    }
}

/// A thresholded weight matrix and the mask of entries that passed.
#[derive(Debug, Clone)]
pub struct Thresholded {
    weights: DMatrix<f64>,
    mask: DMatrix<bool>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl Thresholded {
    /// Returns the masked weight matrix.
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// Returns the mask of entries that passed both cutoffs.
    pub fn mask(&self) -> &DMatrix<bool> {
        &self.mask
    }

    /// Converts the nonzero entries into a graph keyed by region labels.
    ///
    /// In undirected mode an asymmetric pair of entries becomes a single edge carrying the
    /// larger of the two weights.
    pub fn to_graph(&self, directed: bool) -> Graph<&str> {
        let n = self.row_labels.len();
        let mut graph = if directed {
            Graph::directed()
        } else {
            Graph::new()
        };

        for i in 0..n {
            for j in 0..n {
                if i == j || (!directed && j < i) {
                    continue;
                }

                let weight = if directed {
                    self.weights[(i, j)]
                } else {
                    self.weights[(i, j)].max(self.weights[(j, i)])
                };

                if weight != 0.0 {
                    graph.insert_weighted(
                        Edge::new(self.row_labels[i].as_str(), self.col_labels[j].as_str()),
                        weight,
                    );
                }
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn dataset() -> WeightMatrix {
        WeightMatrix::from_rows(
            labels(&["a", "b", "c"]),
            labels(&["a", "b", "c"]),
            vec![
                vec![5.0, 1.0, 0.0],
                vec![2.0, 5.0, 3.0],
                vec![0.0, 4.0, 5.0],
            ],
            vec![
                vec![0.0, 0.001, 0.5],
                vec![0.5, 0.0, 0.001],
                vec![0.5, 0.001, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_square_weights() {
        let result = WeightMatrix::from_rows(
            labels(&["a", "b"]),
            labels(&["a", "b"]),
            vec![vec![0.0, 1.0], vec![1.0]],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        assert!(matches!(
            result,
            Err(WeightError::NotSquare {
                rows: 2,
                row: 1,
                len: 1
            })
        ));
    }

    #[test]
    fn rejects_mismatched_pvalues() {
        let result = WeightMatrix::from_rows(
            labels(&["a"]),
            labels(&["a"]),
            vec![vec![0.0]],
            vec![],
        );

        assert!(matches!(result, Err(WeightError::PvalueShapeMismatch)));
    }

    #[test]
    fn rejects_mismatched_labels() {
        let result = WeightMatrix::from_rows(
            labels(&["a"]),
            labels(&["a", "b"]),
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        assert!(matches!(
            result,
            Err(WeightError::LabelCountMismatch {
                expected: 2,
                rows: 1,
                cols: 2
            })
        ));
    }

    #[test]
    fn threshold_applies_both_cutoffs_and_zeroes_diagonal() {
        let net = dataset().threshold(0.01, 1.5);

        // (0, 1) passes the p-value cutoff but not the weight cutoff; (1, 2) and (2, 1) pass
        // both; the diagonal always fails.
        assert_eq!(net.weights()[(0, 1)], 0.0);
        assert_eq!(net.weights()[(1, 2)], 3.0);
        assert_eq!(net.weights()[(2, 1)], 4.0);
        assert_eq!(net.weights()[(1, 1)], 0.0);

        assert!(!net.mask()[(0, 1)]);
        assert!(net.mask()[(1, 2)]);
    }

    #[test]
    fn to_graph_undirected_takes_max_weight() {
        let net = dataset().threshold(0.01, 0.0);
        let graph = net.to_graph(false);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight(&Edge::new("a", "b")), Some(1.0));
        assert_eq!(graph.weight(&Edge::new("b", "c")), Some(4.0));
    }

    #[test]
    fn to_graph_directed_keeps_asymmetry() {
        let net = dataset().threshold(0.01, 0.0);
        let graph = net.to_graph(true);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight(&Edge::new("a", "b")), Some(1.0));
        assert_eq!(graph.weight(&Edge::new("b", "a")), None);
        assert_eq!(graph.weight(&Edge::new("b", "c")), Some(3.0));
        assert_eq!(graph.weight(&Edge::new("c", "b")), Some(4.0));
    }

    #[test]
    fn load_reads_a_dataset_directory() {
        let dir = std::env::temp_dir().join("connectoscope-weights-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(WEIGHTS_FILE),
            r#"{
                "row_labels": ["a", "b"],
                "col_labels": ["a", "b"],
                "weights": [[0.0, 1.0], [2.0, 0.0]],
                "pvalues": [[1.0, 0.001], [0.001, 1.0]]
            }"#,
        )
        .unwrap();

        let dataset = WeightMatrix::load(&dir).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.weights()[(1, 0)], 2.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
