//! Ridge regression fit in closed form
//!
//! Minimizes ||y - Xβ||² + α||β||² via the normal equations
//! (X'X + αI)β = X'y, solved by Cholesky decomposition. Data is
//! mean-centered so the intercept absorbs the means and the penalty
//! never shrinks it.

use ndarray::{Array1, Array2, Axis};

use crate::{HoopsError, Result};

/// L2-regularized linear regression
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    alpha: f64,
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        RidgeRegression {
            alpha,
            coefficients: None,
            intercept: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reassemble a fitted model from persisted parameters
    pub fn from_parts(alpha: f64, coefficients: Array1<f64>, intercept: f64) -> Self {
        RidgeRegression {
            alpha,
            coefficients: Some(coefficients),
            intercept: Some(intercept),
        }
    }

    /// Fit coefficients and intercept
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if self.alpha < 0.0 {
            return Err(HoopsError::Model(format!(
                "invalid ridge alpha: {}",
                self.alpha
            )));
        }
        if x.nrows() != y.len() {
            return Err(HoopsError::Model(format!(
                "row count mismatch: {} feature rows, {} targets",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(HoopsError::Model("cannot fit on an empty table".to_string()));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| HoopsError::Model("empty feature matrix".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);
        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        let n_features = x_centered.ncols();
        let mut xtx = x_centered.t().dot(&x_centered);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_centered.t().dot(&y_centered);

        let coefficients = cholesky_solve(&xtx, &xty)?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Predict targets for a feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| HoopsError::Model("model has not been fitted".to_string()))?;
        let intercept = self
            .intercept
            .ok_or_else(|| HoopsError::Model("model has not been fitted".to_string()))?;

        if x.ncols() != coefficients.len() {
            return Err(HoopsError::Model(format!(
                "feature count mismatch: model expects {}, got {}",
                coefficients.len(),
                x.ncols()
            )));
        }

        Ok(x.dot(coefficients) + intercept)
    }
}

/// Solve Ax = b for a symmetric positive-definite A
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(HoopsError::Model(
                        "normal equations matrix is not positive definite".to_string(),
                    ));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_linear_relation() {
        // y = 2*x0 - 3*x1 + 5
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![
                1.0, 0.0, 2.0, 1.0, 3.0, 4.0, 4.0, 2.0, 5.0, 5.0, 6.0, 1.0,
            ],
        )
        .unwrap();
        let y = x.map_axis(Axis(1), |row| 2.0 * row[0] - 3.0 * row[1] + 5.0);

        let mut model = RidgeRegression::new(1e-8);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-4);
        assert!((coef[1] + 3.0).abs() < 1e-4);
        assert!((model.intercept.unwrap() - 5.0).abs() < 1e-3);

        let preds = model.predict(&x).unwrap();
        for (pred, actual) in preds.iter().zip(y.iter()) {
            assert!((pred - actual).abs() < 1e-3);
        }
    }

    #[test]
    fn test_regularization_shrinks_coefficients() {
        let x = Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = Array1::from_vec(vec![2.0, 4.0, 6.0, 8.0]);

        let mut loose = RidgeRegression::new(1e-8);
        loose.fit(&x, &y).unwrap();
        let mut tight = RidgeRegression::new(100.0);
        tight.fit(&x, &y).unwrap();

        let loose_coef = loose.coefficients.unwrap()[0];
        let tight_coef = tight.coefficients.unwrap()[0];
        assert!(tight_coef.abs() < loose_coef.abs());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = RidgeRegression::new(1.0);
        let x = Array2::zeros((1, 2));
        assert!(model.predict(&x).is_err());
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = Array1::from_vec(vec![1.0]);
        let mut model = RidgeRegression::new(1.0);
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_constant_column_is_handled_by_ridge() {
        // A constant column after centering is all zeros; the penalty
        // keeps the system solvable
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 1.0, 2.0, 1.0, 3.0, 1.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let mut model = RidgeRegression::new(1.0);
        assert!(model.fit(&x, &y).is_ok());
    }
}
