//! Spread prediction for upcoming matchups
//!
//! Featurizes matchups against the historical log, reindexes onto the
//! training-time column list, and post-processes the raw regression
//! output the way the submission pipeline expects.

use std::collections::HashSet;

use crate::features::build_matchup_table;
use crate::model::{ModelArtifact, RidgeRegression};
use crate::{FeatureConfig, GameRecord, MatchupRequest, Prediction, Result, TeamId};

/// Damping factor for matchups involving a team with no game history
const OOD_DAMPING: f64 = 0.55;
/// Damped out-of-domain spreads are clamped to this many points
const OOD_CLAMP: f64 = 16.0;
/// All spreads are clamped to this many points
const SPREAD_CLAMP: f64 = 40.0;

/// Predicts home-side point spreads from a trained artifact
pub struct SpreadPredictor {
    model: RidgeRegression,
    trained_cols: Vec<String>,
    features: FeatureConfig,
}

impl SpreadPredictor {
    /// Build a predictor from a saved model and the column list persisted
    /// at training time
    pub fn new(artifact: &ModelArtifact, trained_cols: Vec<String>, features: FeatureConfig) -> Self {
        SpreadPredictor {
            model: artifact.to_model(),
            trained_cols,
            features,
        }
    }

    /// Predict spreads for a list of matchups.
    ///
    /// Output order matches the input matchup order. Matchups where
    /// either side never appears in the historical log are damped and
    /// clamped harder; every spread is clamped to ±40 and rounded to
    /// three decimals.
    pub fn predict_matchups(
        &self,
        games: &[GameRecord],
        matchups: &[MatchupRequest],
    ) -> Result<Vec<Prediction>> {
        let table = build_matchup_table(games, matchups, &self.features);
        let reindexed = table.reindex(&self.trained_cols);
        let raw = self.model.predict(&reindexed.to_matrix())?;

        let known_teams: HashSet<TeamId> = games
            .iter()
            .flat_map(|g| [g.home_team, g.away_team])
            .collect();

        let predictions = matchups
            .iter()
            .zip(raw.iter())
            .map(|(matchup, &value)| {
                let out_of_domain = !known_teams.contains(&matchup.home_team)
                    || !known_teams.contains(&matchup.away_team);

                let mut spread = value;
                if out_of_domain {
                    spread = (spread * OOD_DAMPING).clamp(-OOD_CLAMP, OOD_CLAMP);
                }
                spread = spread.clamp(-SPREAD_CLAMP, SPREAD_CLAMP);
                spread = (spread * 1000.0).round() / 1000.0;
                if spread == 0.0 {
                    spread = 0.0; // normalize -0.0
                }

                Prediction {
                    date: matchup.date,
                    home_team: matchup.home_team,
                    away_team: matchup.away_team,
                    spread,
                    out_of_domain,
                }
            })
            .collect();

        Ok(predictions)
    }
}

/// Format a single prediction for terminal display
pub fn format_prediction(pred: &Prediction, home_name: &str, away_name: &str) -> String {
    let (favorite, points) = if pred.spread >= 0.0 {
        (home_name, pred.spread)
    } else {
        (away_name, -pred.spread)
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}  ({})
├─────────────────────────────────────────────────┤
│  Predicted spread:  {} {:+.1}
│  Favorite:          {} by {:.1}
└─────────────────────────────────────────────────┘
"#,
        home_name, away_name, pred.date, home_name, pred.spread, favorite, points
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn features() -> FeatureConfig {
        FeatureConfig {
            windows: vec![5, 10],
            elo_k: 20.0,
            elo_home_advantage: 65.0,
        }
    }

    /// Artifact predicting a constant: zero coefficients, fixed intercept
    fn constant_artifact(intercept: f64, cols: &[String]) -> ModelArtifact {
        ModelArtifact {
            alpha: 1.0,
            intercept,
            coefficients: vec![0.0; cols.len()],
            feature_cols: cols.to_vec(),
        }
    }

    fn history() -> Vec<GameRecord> {
        vec![
            GameRecord {
                date: d(1, 2),
                home_team: TeamId(1),
                away_team: TeamId(2),
                home_score: 70,
                away_score: 60,
            },
            GameRecord {
                date: d(1, 5),
                home_team: TeamId(2),
                away_team: TeamId(1),
                home_score: 66,
                away_score: 64,
            },
        ]
    }

    #[test]
    fn test_in_domain_prediction_passes_through() {
        let cols = vec!["home_adv".to_string()];
        let artifact = constant_artifact(7.5, &cols);
        let predictor = SpreadPredictor::new(&artifact, cols, features());

        let matchups = vec![MatchupRequest {
            date: d(2, 1),
            home_team: TeamId(1),
            away_team: TeamId(2),
        }];
        let preds = predictor.predict_matchups(&history(), &matchups).unwrap();

        assert_eq!(preds.len(), 1);
        assert!(!preds[0].out_of_domain);
        assert_eq!(preds[0].spread, 7.5);
    }

    #[test]
    fn test_out_of_domain_is_damped_and_clamped() {
        let cols = vec!["home_adv".to_string()];
        let artifact = constant_artifact(40.0, &cols);
        let predictor = SpreadPredictor::new(&artifact, cols, features());

        // Team 99 never appears in the history
        let matchups = vec![MatchupRequest {
            date: d(2, 1),
            home_team: TeamId(1),
            away_team: TeamId(99),
        }];
        let preds = predictor.predict_matchups(&history(), &matchups).unwrap();

        assert!(preds[0].out_of_domain);
        // 40 * 0.55 = 22, clamped to the OOD bound
        assert_eq!(preds[0].spread, 16.0);
    }

    #[test]
    fn test_global_clamp() {
        let cols = vec!["home_adv".to_string()];
        let artifact = constant_artifact(120.0, &cols);
        let predictor = SpreadPredictor::new(&artifact, cols, features());

        let matchups = vec![MatchupRequest {
            date: d(2, 1),
            home_team: TeamId(1),
            away_team: TeamId(2),
        }];
        let preds = predictor.predict_matchups(&history(), &matchups).unwrap();
        assert_eq!(preds[0].spread, 40.0);
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let cols = vec!["home_adv".to_string()];
        let artifact = constant_artifact(-0.0001, &cols);
        let predictor = SpreadPredictor::new(&artifact, cols, features());

        let matchups = vec![MatchupRequest {
            date: d(2, 1),
            home_team: TeamId(1),
            away_team: TeamId(2),
        }];
        let preds = predictor.predict_matchups(&history(), &matchups).unwrap();
        assert!(preds[0].spread.is_sign_positive());
        assert_eq!(preds[0].spread, 0.0);
    }

    #[test]
    fn test_output_aligns_with_input_order() {
        let cols = vec!["home_adv".to_string()];
        let artifact = constant_artifact(3.0, &cols);
        let predictor = SpreadPredictor::new(&artifact, cols, features());

        // Dates intentionally out of order
        let matchups = vec![
            MatchupRequest {
                date: d(3, 9),
                home_team: TeamId(1),
                away_team: TeamId(2),
            },
            MatchupRequest {
                date: d(2, 1),
                home_team: TeamId(2),
                away_team: TeamId(1),
            },
        ];
        let preds = predictor.predict_matchups(&history(), &matchups).unwrap();

        assert_eq!(preds[0].date, d(3, 9));
        assert_eq!(preds[0].home_team, TeamId(1));
        assert_eq!(preds[1].date, d(2, 1));
        assert_eq!(preds[1].home_team, TeamId(2));
    }

    #[test]
    fn test_format_prediction_names_favorite() {
        let pred = Prediction {
            date: d(2, 1),
            home_team: TeamId(1),
            away_team: TeamId(2),
            spread: -4.5,
            out_of_domain: false,
        };
        let text = format_prediction(&pred, "Duke", "Kansas");
        assert!(text.contains("Kansas by 4.5"));
    }
}
