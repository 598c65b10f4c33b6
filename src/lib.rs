//! Point-spread prediction for college basketball
//!
//! Builds leak-free feature tables from a historical game log and fits a
//! ridge regression to predict home-side point spreads.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// A team with its canonical name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A completed game with known final scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u32,
    pub away_score: u32,
}

impl GameRecord {
    /// Score margin from the home side's perspective (positive = home win)
    pub fn margin(&self) -> i32 {
        self.home_score as i32 - self.away_score as i32
    }

    /// Score for a specific team, if it played in this game
    pub fn score_for(&self, team: TeamId) -> Option<u32> {
        if team == self.home_team {
            Some(self.home_score)
        } else if team == self.away_team {
            Some(self.away_score)
        } else {
            None
        }
    }

    /// Score against a specific team, if it played in this game
    pub fn score_against(&self, team: TeamId) -> Option<u32> {
        if team == self.home_team {
            Some(self.away_score)
        } else if team == self.away_team {
            Some(self.home_score)
        } else {
            None
        }
    }
}

/// A future game with known participants and no outcome yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRequest {
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
}

/// A predicted home-side point spread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
    /// Predicted home margin (positive = home favored)
    pub spread: f64,
    /// True if either side had no game history when featurized
    pub out_of_domain: bool,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Team not found with ID: {0}")]
    TeamNotFound(TeamId),

    #[error("Model not trained - run `hoops train` first")]
    NoModel,

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub features: FeatureConfig,
    pub training: TrainingConfig,
    pub data: DataConfig,
}

/// Feature engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Rolling window sizes, in games
    pub windows: Vec<usize>,
    /// Elo step size per game
    pub elo_k: f64,
    /// Home advantage in rating points
    pub elo_home_advantage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// L2 regularization strength for the ridge fit
    pub ridge_alpha: f64,
    /// Fraction of rows (most recent) held out for validation
    pub validation_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
    pub model_path: String,
    pub feature_cols_path: String,
    pub team_map_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            features: FeatureConfig {
                windows: vec![5, 10],
                elo_k: 20.0,
                elo_home_advantage: 65.0,
            },
            training: TrainingConfig {
                ridge_alpha: 1.0,
                validation_fraction: 0.2,
            },
            data: DataConfig {
                database_path: "data/hoops.db".to_string(),
                model_path: "models/model.json".to_string(),
                feature_cols_path: "models/feature_cols.json".to_string(),
                team_map_path: "data/team_name_map.csv".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin() {
        let game = GameRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            home_team: TeamId(1),
            away_team: TeamId(2),
            home_score: 70,
            away_score: 60,
        };
        assert_eq!(game.margin(), 10);
        assert_eq!(game.score_for(TeamId(2)), Some(60));
        assert_eq!(game.score_against(TeamId(2)), Some(70));
        assert_eq!(game.score_for(TeamId(3)), None);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.features.windows, vec![5, 10]);
        assert_eq!(config.features.elo_k, 20.0);
        assert_eq!(config.features.elo_home_advantage, 65.0);
    }
}
