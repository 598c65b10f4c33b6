//! Trained model persistence
//!
//! Two JSON artifacts: the model itself (alpha, intercept, coefficients,
//! column names) and the bare ordered feature-column list. The column
//! list written at training time is replayed verbatim at prediction time;
//! inference tables are reindexed onto it before the model sees them.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::ridge::RidgeRegression;
use crate::{HoopsError, Result};

/// Serialized ridge model plus its training-time column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub alpha: f64,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub feature_cols: Vec<String>,
}

impl ModelArtifact {
    /// Capture a fitted model
    pub fn from_model(model: &RidgeRegression, feature_cols: Vec<String>) -> Result<Self> {
        let coefficients = model
            .coefficients
            .as_ref()
            .ok_or_else(|| HoopsError::Model("cannot save an unfitted model".to_string()))?;
        let intercept = model
            .intercept
            .ok_or_else(|| HoopsError::Model("cannot save an unfitted model".to_string()))?;

        if coefficients.len() != feature_cols.len() {
            return Err(HoopsError::Model(format!(
                "coefficient/column mismatch: {} vs {}",
                coefficients.len(),
                feature_cols.len()
            )));
        }

        Ok(ModelArtifact {
            alpha: model.alpha(),
            intercept,
            coefficients: coefficients.to_vec(),
            feature_cols,
        })
    }

    /// Rebuild the fitted model
    pub fn to_model(&self) -> RidgeRegression {
        RidgeRegression::from_parts(
            self.alpha,
            Array1::from_vec(self.coefficients.clone()),
            self.intercept,
        )
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a saved model; a missing file means training never ran
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HoopsError::NoModel);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Write the ordered feature-column list
pub fn save_feature_cols<P: AsRef<Path>>(path: P, columns: &[String]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(columns)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read the ordered feature-column list saved at training time
pub fn load_feature_cols<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HoopsError::NoModel);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn fitted_model() -> RidgeRegression {
        let x = Array2::from_shape_vec((4, 2), vec![1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 1.0])
            .unwrap();
        let y = Array1::from_vec(vec![3.0, 3.0, 6.0, 5.0]);
        let mut model = RidgeRegression::new(0.5);
        model.fit(&x, &y).unwrap();
        model
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = fitted_model();
        let cols = vec!["a".to_string(), "b".to_string()];
        let artifact = ModelArtifact::from_model(&model, cols.clone()).unwrap();
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.feature_cols, cols);
        assert_eq!(loaded.alpha, 0.5);

        let x = Array2::from_shape_vec((1, 2), vec![2.5, 2.0]).unwrap();
        let expected = model.predict(&x).unwrap();
        let actual = loaded.to_model().predict(&x).unwrap();
        assert!((expected[0] - actual[0]).abs() < 1e-12);
    }

    #[test]
    fn test_missing_model_is_no_model() {
        let err = ModelArtifact::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, HoopsError::NoModel));
    }

    #[test]
    fn test_unfitted_model_cannot_be_saved() {
        let model = RidgeRegression::new(1.0);
        assert!(ModelArtifact::from_model(&model, vec![]).is_err());
    }

    #[test]
    fn test_feature_cols_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_cols.json");

        let cols = vec!["home_adv".to_string(), "elo_diff".to_string()];
        save_feature_cols(&path, &cols).unwrap();
        assert_eq!(load_feature_cols(&path).unwrap(), cols);
    }
}
