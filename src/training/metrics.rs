//! Regression evaluation metrics

use std::fmt;

/// Mean absolute error
pub fn mean_absolute_error(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / predictions.len() as f64
}

/// Root mean squared error
pub fn root_mean_squared_error(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let mse = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>()
        / predictions.len() as f64;
    mse.sqrt()
}

/// Validation-set summary for one training run
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub mae: f64,
    pub rmse: f64,
    /// MAE of always predicting the training-set mean margin
    pub baseline_mae: f64,
    pub rows: usize,
}

impl ValidationReport {
    /// Score predictions against held-out targets, with a constant
    /// mean-margin predictor as the baseline
    pub fn compute(predictions: &[f64], targets: &[f64], train_mean_margin: f64) -> Self {
        let baseline: Vec<f64> = vec![train_mean_margin; targets.len()];
        ValidationReport {
            mae: mean_absolute_error(predictions, targets),
            rmse: root_mean_squared_error(predictions, targets),
            baseline_mae: mean_absolute_error(&baseline, targets),
            rows: targets.len(),
        }
    }

    /// True when the model beats the constant baseline
    pub fn beats_baseline(&self) -> bool {
        self.mae < self.baseline_mae
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE: {:.3} | RMSE: {:.3} | baseline MAE: {:.3} ({} rows)",
            self.mae, self.rmse, self.baseline_mae, self.rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mae() {
        let preds = [1.0, 2.0, 3.0];
        let targets = [2.0, 2.0, 1.0];
        assert!((mean_absolute_error(&preds, &targets) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_weights_large_errors() {
        let preds = [0.0, 0.0];
        let targets = [3.0, -3.0];
        assert!((root_mean_squared_error(&preds, &targets) - 3.0).abs() < 1e-12);

        let uneven_preds = [0.0, 0.0];
        let uneven_targets = [0.0, 6.0];
        let rmse = root_mean_squared_error(&uneven_preds, &uneven_targets);
        let mae = mean_absolute_error(&uneven_preds, &uneven_targets);
        assert!(rmse > mae);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean_absolute_error(&[], &[]), 0.0);
        assert_eq!(root_mean_squared_error(&[], &[]), 0.0);
    }

    #[test]
    fn test_report() {
        let preds = [1.0, -1.0];
        let targets = [2.0, -2.0];
        let report = ValidationReport::compute(&preds, &targets, 0.0);
        assert!((report.mae - 1.0).abs() < 1e-12);
        assert!((report.baseline_mae - 2.0).abs() < 1e-12);
        assert!(report.beats_baseline());
    }
}
