use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_PCA_COMPONENTS, EPSILON};
use crate::error::{ImprepError, Result};

/// How many principal components a fit keeps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PcaTarget {
    /// Keep at most this many components (0 keeps all).
    Components(usize),
    /// Keep the fewest components whose cumulative explained variance
    /// reaches this fraction, in (0, 1].
    RetainedVariance(f64),
}

impl Default for PcaTarget {
    fn default() -> Self {
        PcaTarget::Components(DEFAULT_PCA_COMPONENTS)
    }
}

impl PcaTarget {
    pub fn validate(&self) -> Result<()> {
        match *self {
            PcaTarget::Components(_) => Ok(()),
            PcaTarget::RetainedVariance(f) if f > 0.0 && f <= 1.0 => Ok(()),
            PcaTarget::RetainedVariance(f) => Err(ImprepError::InvalidInput(format!(
                "retained variance must be in (0, 1], got {f}"
            ))),
        }
    }
}

impl std::fmt::Display for PcaTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PcaTarget::Components(0) => write!(f, "all components"),
            PcaTarget::Components(k) => write!(f, "{k} components"),
            PcaTarget::RetainedVariance(v) => write!(f, "{:.1}% variance", v * 100.0),
        }
    }
}

/// A fitted PCA basis: mean, components (one per row) and their variances.
#[derive(Clone, Debug, PartialEq)]
pub struct PcaBasis {
    pub mean: Array1<f32>,
    /// Shape = (components, dim); rows are unit vectors ordered by
    /// decreasing eigenvalue.
    pub eigenvectors: Array2<f32>,
    pub eigenvalues: Array1<f32>,
}

impl PcaBasis {
    /// Fit a basis over `data`, one sample per row.
    pub fn fit(data: &ArrayView2<f32>, target: PcaTarget) -> Result<Self> {
        target.validate()?;
        let (n, dim) = data.dim();
        if n == 0 || dim == 0 {
            return Err(ImprepError::InvalidInput(
                "PCA needs at least one non-empty sample".into(),
            ));
        }

        let centered_f64 = data.mapv(f64::from);
        let mean = centered_f64.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(dim));
        let centered = &centered_f64 - &mean.view().insert_axis(Axis(0));

        let (values, vectors) = if dim <= n {
            let covar = centered.t().dot(&centered) / n as f64;
            symmetric_eigen(&covar)
        } else {
            gram_components(&centered)
        };

        let available = values.len();
        let keep = select_component_count(&values, target).min(available);
        debug!(samples = n, dim, available, keep, "PCA basis fitted");

        Ok(Self {
            mean: mean.mapv(|v| v as f32),
            eigenvectors: vectors.slice(ndarray::s![..keep, ..]).mapv(|v| v as f32),
            eigenvalues: values.slice(ndarray::s![..keep]).mapv(|v| v as f32),
        })
    }

    /// Fit from a list of flattened rows; rows must all have the same length.
    pub fn fit_rows(rows: &[Vec<f32>], target: PcaTarget) -> Result<Self> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(ImprepError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), dim), flat)
            .map_err(|e| ImprepError::InvalidInput(e.to_string()))?;
        Self::fit(&data.view(), target)
    }

    pub fn n_components(&self) -> usize {
        self.eigenvectors.nrows()
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Project a flattened sample into component space.
    pub fn project(&self, row: &ArrayView1<f32>) -> Result<Array1<f32>> {
        if row.len() != self.dim() {
            return Err(ImprepError::DimensionMismatch {
                expected: self.dim(),
                actual: row.len(),
            });
        }
        let centered = row - &self.mean;
        Ok(self.eigenvectors.dot(&centered))
    }

    /// Map component coefficients back into sample space.
    pub fn back_project(&self, coeffs: &ArrayView1<f32>) -> Result<Array1<f32>> {
        if coeffs.len() != self.n_components() {
            return Err(ImprepError::DimensionMismatch {
                expected: self.n_components(),
                actual: coeffs.len(),
            });
        }
        Ok(self.eigenvectors.t().dot(coeffs) + &self.mean)
    }
}

/// Symmetric eigen-decomposition sorted by decreasing eigenvalue.
/// Eigenvectors are returned one per row.
fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = matrix.nrows();
    let eig = SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| matrix[[i, j]]));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

    let values = Array1::from_iter(order.iter().map(|&i| eig.eigenvalues[i]));
    let vectors = Array2::from_shape_fn((n, n), |(r, c)| eig.eigenvectors[(c, order[r])]);
    (values, vectors)
}

/// Eigenpairs via the n x n Gram matrix when samples are fewer than
/// dimensions. Gram eigenvectors are mapped back through X^T and
/// normalized; null-space directions are dropped.
fn gram_components(centered: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let (n, dim) = centered.dim();
    let gram = centered.dot(&centered.t()) / n as f64;
    let (values, vectors) = symmetric_eigen(&gram);

    let top = values.iter().copied().fold(0.0f64, f64::max);
    let mapped: Vec<(f64, Array1<f64>)> = (0..n)
        .into_par_iter()
        .filter(|&i| values[i] > top * EPSILON)
        .filter_map(|i| {
            let component = centered.t().dot(&vectors.row(i));
            let norm = component.dot(&component).sqrt();
            (norm > EPSILON).then(|| (values[i], component / norm))
        })
        .collect();

    // Constant samples: fall back to the first n axes, projections are zero.
    if mapped.is_empty() {
        let axes = Array2::from_shape_fn((n, dim), |(r, c)| if r == c { 1.0 } else { 0.0 });
        return (Array1::zeros(n), axes);
    }

    let mut out_values = Array1::<f64>::zeros(mapped.len());
    let mut out_vectors = Array2::<f64>::zeros((mapped.len(), dim));
    for (i, (value, vector)) in mapped.into_iter().enumerate() {
        out_values[i] = value;
        out_vectors.row_mut(i).assign(&vector);
    }
    (out_values, out_vectors)
}

fn select_component_count(values: &Array1<f64>, target: PcaTarget) -> usize {
    match target {
        PcaTarget::Components(0) => values.len(),
        PcaTarget::Components(k) => k,
        PcaTarget::RetainedVariance(fraction) => {
            let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
            if total <= EPSILON {
                return values.len();
            }
            let mut cumulative = 0.0;
            for (i, v) in values.iter().enumerate() {
                cumulative += v.max(0.0);
                if cumulative / total >= fraction - 1e-12 {
                    return i + 1;
                }
            }
            values.len()
        }
    }
}
