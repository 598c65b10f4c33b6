//! Ridge training over the historical game log
//!
//! Splits by time order (the tail of the log is the holdout), scores the
//! fit against a constant baseline, then refits on everything for the
//! saved model.

use ndarray::s;

use crate::features::build_training_table;
use crate::model::ModelArtifact;
use crate::model::RidgeRegression;
use crate::training::metrics::ValidationReport;
use crate::{Config, FeatureConfig, GameRecord, HoopsError, Result, TrainingConfig};

/// Output of one training run
#[derive(Debug, Clone)]
pub struct TrainedSpreadModel {
    pub artifact: ModelArtifact,
    /// Holdout scores; absent when the log is too small to split
    pub validation: Option<ValidationReport>,
    /// Feature rows the final model was fitted on
    pub rows: usize,
}

/// Fits the spread model from a game log
pub struct SpreadTrainer {
    features: FeatureConfig,
    training: TrainingConfig,
}

impl SpreadTrainer {
    pub fn new(config: &Config) -> Self {
        SpreadTrainer {
            features: config.features.clone(),
            training: config.training.clone(),
        }
    }

    pub fn train(&self, games: &[GameRecord]) -> Result<TrainedSpreadModel> {
        if games.is_empty() {
            return Err(HoopsError::Config(
                "No games in database. Run `hoops data import` first.".to_string(),
            ));
        }

        let table = build_training_table(games, &self.features);
        let x = table.features.to_matrix();
        let y = ndarray::Array1::from_vec(table.targets.clone());
        let n = table.features.len();

        log::info!(
            "Built training table: {} rows x {} features",
            n,
            table.features.columns.len()
        );

        // Time-ordered split: train on the head, validate on the tail
        let holdout = (n as f64 * self.training.validation_fraction.clamp(0.0, 0.9)) as usize;
        let split = n - holdout;

        let validation = if holdout > 0 && split > 0 {
            let mut model = RidgeRegression::new(self.training.ridge_alpha);
            model.fit(
                &x.slice(s![..split, ..]).to_owned(),
                &y.slice(s![..split]).to_owned(),
            )?;

            let predictions = model.predict(&x.slice(s![split.., ..]).to_owned())?.to_vec();
            let targets = &table.targets[split..];
            let train_mean = table.targets[..split].iter().sum::<f64>() / split as f64;

            let report = ValidationReport::compute(&predictions, targets, train_mean);
            log::debug!("Validation: {}", report);
            Some(report)
        } else {
            log::warn!("Too few games to hold out a validation set ({} rows)", n);
            None
        };

        // Final model uses every row
        let mut model = RidgeRegression::new(self.training.ridge_alpha);
        model.fit(&x, &y)?;

        let artifact = ModelArtifact::from_model(&model, table.features.columns.clone())?;
        Ok(TrainedSpreadModel {
            artifact,
            validation,
            rows: n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamId;
    use chrono::NaiveDate;

    fn synthetic_log(n: usize) -> Vec<GameRecord> {
        // Team 1 is consistently stronger than teams 2..5; the learned
        // model should pick that up through ratings and rolling margins
        let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        (0..n)
            .map(|i| {
                let opponent = 2 + (i % 4) as i64;
                let home_first = i % 2 == 0;
                let date = start + chrono::Days::new(2 * i as u64);
                if home_first {
                    GameRecord {
                        date,
                        home_team: TeamId(1),
                        away_team: TeamId(opponent),
                        home_score: 80,
                        away_score: 65,
                    }
                } else {
                    GameRecord {
                        date,
                        home_team: TeamId(opponent),
                        away_team: TeamId(1),
                        home_score: 62,
                        away_score: 74,
                    }
                }
            })
            .collect()
    }

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_empty_log_fails_fast() {
        let trainer = SpreadTrainer::new(&config());
        assert!(trainer.train(&[]).is_err());
    }

    #[test]
    fn test_train_produces_artifact_with_columns() {
        let trainer = SpreadTrainer::new(&config());
        let trained = trainer.train(&synthetic_log(40)).unwrap();

        assert_eq!(trained.rows, 40);
        assert_eq!(
            trained.artifact.coefficients.len(),
            trained.artifact.feature_cols.len()
        );
        assert!(trained
            .artifact
            .feature_cols
            .contains(&"elo_diff".to_string()));
        assert!(trained.validation.is_some());
    }

    #[test]
    fn test_tiny_log_skips_validation() {
        let trainer = SpreadTrainer::new(&config());
        let trained = trainer.train(&synthetic_log(3)).unwrap();
        assert!(trained.validation.is_none());
    }

    #[test]
    fn test_deterministic_artifacts() {
        let trainer = SpreadTrainer::new(&config());
        let games = synthetic_log(30);
        let a = trainer.train(&games).unwrap();
        let b = trainer.train(&games).unwrap();
        assert_eq!(a.artifact.feature_cols, b.artifact.feature_cols);
        assert_eq!(a.artifact.coefficients, b.artifact.coefficients);
    }
}
