//! Ridge regression (L2-regularised least squares)
//!
//! The intercept is not penalised: features and target are centred before
//! solving `(XᵀX + αI) w = Xᵀy`, and the intercept is recovered from the means.

use super::Regressor;
use crate::error::{PredictorError, Result};
use crate::types::FeatureMatrix;

#[derive(Debug, Clone)]
struct RidgeFit {
    weights: Vec<f64>,
    intercept: f64,
}

/// Linear model with an L2 penalty of strength `alpha`
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    alpha: f64,
    fitted: Option<RidgeFit>,
}

impl RidgeRegressor {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            fitted: None,
        }
    }

    /// Fitted coefficients, one per feature column
    pub fn weights(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.weights.as_slice())
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.intercept)
    }
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Regressor for RidgeRegressor {
    fn fit(&mut self, features: &FeatureMatrix, target: &[f64]) -> Result<()> {
        let n = features.n_rows();
        let p = features.n_features();

        if n == 0 {
            return Err(PredictorError::Model("ridge: empty training set".into()));
        }
        if target.len() != n {
            return Err(PredictorError::Model(format!(
                "ridge: {} target values for {} rows",
                target.len(),
                n
            )));
        }

        let n_f = n as f64;
        let mut x_mean = vec![0.0; p];
        for row in features.rows() {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        x_mean.iter_mut().for_each(|m| *m /= n_f);
        let y_mean = target.iter().sum::<f64>() / n_f;

        // Centred normal equations
        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        let mut centred = vec![0.0; p];
        for (row, &y) in features.rows().iter().zip(target) {
            for j in 0..p {
                centred[j] = row[j] - x_mean[j];
            }
            let yc = y - y_mean;
            for j in 0..p {
                rhs[j] += centred[j] * yc;
                for k in j..p {
                    gram[j][k] += centred[j] * centred[k];
                }
            }
        }
        for j in 0..p {
            for k in 0..j {
                gram[j][k] = gram[k][j];
            }
            gram[j][j] += self.alpha;
        }

        let weights = solve_linear_system(gram, rhs).ok_or_else(|| {
            PredictorError::Model(format!(
                "ridge: singular system (alpha = {}); try a larger alpha",
                self.alpha
            ))
        })?;
        let intercept = y_mean - x_mean.iter().zip(&weights).map(|(m, w)| m * w).sum::<f64>();

        tracing::debug!("Ridge fitted on {} rows x {} features", n, p);
        self.fitted = Some(RidgeFit { weights, intercept });
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        let fit = self
            .fitted
            .as_ref()
            .ok_or_else(|| PredictorError::Model("ridge: predict called before fit".into()))?;

        if features.n_features() != fit.weights.len() {
            return Err(PredictorError::Model(format!(
                "ridge: fitted on {} features, got {}",
                fit.weights.len(),
                features.n_features()
            )));
        }

        Ok(features
            .rows()
            .iter()
            .map(|row| fit.intercept + row.iter().zip(&fit.weights).map(|(x, w)| x * w).sum::<f64>())
            .collect())
    }

    fn name(&self) -> &str {
        "ridge"
    }
}

/// Gaussian elimination with partial pivoting; `None` when the matrix is singular
pub(crate) fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot_row][col].abs() <= 1e-12 * scale {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let delta = factor * a[col][k];
                a[row][k] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
