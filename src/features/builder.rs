//! Feature table construction
//!
//! One engine, two traversals. The engine separates reading pre-game
//! state (`snapshot`, immutable) from committing an outcome (`advance`,
//! the only mutating step), so a row can never observe the game it
//! describes. The training builder replays the full log; the matchup
//! builder merges a cursor over the log against future requests.

use chrono::NaiveDate;
use ndarray::Array2;

use crate::features::rating::{self, EloConfig};
use crate::features::rolling::{self, WindowSummary};
use crate::features::state::TeamStateStore;
use crate::{FeatureConfig, GameRecord, MatchupRequest, TeamId};

/// Rest days reported for a team with no prior game
pub const REST_DEFAULT: f64 = 7.0;
/// Rest days are clamped into [REST_MIN, REST_MAX]
pub const REST_MIN: f64 = 0.0;
pub const REST_MAX: f64 = 14.0;

/// A rectangular feature table with named columns.
///
/// Every row has exactly `columns.len()` values; teams or windows with
/// no history contribute zeros, never missing cells.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-order this table onto a previously persisted column list.
    ///
    /// Columns absent here are filled with 0.0; columns not in `columns`
    /// are dropped. This is the schema-stability contract between a
    /// training run and later inference against its saved column list.
    pub fn reindex(&self, columns: &[String]) -> FeatureTable {
        let source: Vec<Option<usize>> = columns
            .iter()
            .map(|name| self.columns.iter().position(|c| c == name))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                source
                    .iter()
                    .map(|idx| idx.map(|i| row[i]).unwrap_or(0.0))
                    .collect()
            })
            .collect();

        FeatureTable {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Dense row-major matrix view for the regression layer
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.rows.len(), self.columns.len()));
        for (i, row) in self.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                matrix[[i, j]] = *value;
            }
        }
        matrix
    }
}

/// Training output: features plus the observed home margins
#[derive(Debug, Clone)]
pub struct TrainingTable {
    pub features: FeatureTable,
    pub targets: Vec<f64>,
}

/// Sequential feature engine.
///
/// Owns all per-team state for one build pass. A fresh engine is
/// constructed per top-level build so independent builds cannot
/// interfere.
pub struct FeatureEngine {
    store: TeamStateStore,
    windows: Vec<usize>,
    elo: EloConfig,
}

impl FeatureEngine {
    pub fn new(config: &FeatureConfig) -> Self {
        FeatureEngine {
            store: TeamStateStore::new(),
            windows: config.windows.clone(),
            elo: EloConfig {
                k: config.elo_k,
                home_advantage: config.elo_home_advantage,
            },
        }
    }

    /// Column names, in the exact order `snapshot` emits values.
    /// Deterministic given the window configuration.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec![
            "home_adv".to_string(),
            "home_rest".to_string(),
            "away_rest".to_string(),
            "rest_diff".to_string(),
            "home_elo".to_string(),
            "away_elo".to_string(),
            "elo_diff".to_string(),
        ];
        for &w in &self.windows {
            cols.extend(WindowSummary::names(w).map(|n| format!("home_{}", n)));
        }
        for &w in &self.windows {
            cols.extend(WindowSummary::names(w).map(|n| format!("away_{}", n)));
        }
        for &w in &self.windows {
            cols.extend(WindowSummary::names(w).map(|n| format!("diff_{}", n)));
        }
        cols
    }

    /// Emit one feature row from current (pre-game) state. Read-only:
    /// the game being featurized has not been applied and never is here.
    pub fn snapshot(&self, date: NaiveDate, home: TeamId, away: TeamId) -> Vec<f64> {
        let home_state = self.store.get(home);
        let away_state = self.store.get(away);

        let home_rest = self.rest_days(home, date);
        let away_rest = self.rest_days(away, date);

        let home_roll = rolling::summarize(home_state, &self.windows);
        let away_roll = rolling::summarize(away_state, &self.windows);

        let mut row = vec![
            1.0,
            home_rest,
            away_rest,
            home_rest - away_rest,
            home_state.rating,
            away_state.rating,
            (home_state.rating + self.elo.home_advantage) - away_state.rating,
        ];
        for summary in &home_roll {
            row.extend(summary.values());
        }
        for summary in &away_roll {
            row.extend(summary.values());
        }
        for (h, a) in home_roll.iter().zip(away_roll.iter()) {
            for (hv, av) in h.values().into_iter().zip(a.values()) {
                row.push(hv - av);
            }
        }
        row
    }

    /// Commit a finished game: append both histories and apply the
    /// rating update. Ratings are read before either mutation so the
    /// update sees pre-game values.
    pub fn advance(&mut self, game: &GameRecord) {
        let margin = game.margin() as f64;
        let home_score = game.home_score as f64;
        let away_score = game.away_score as f64;

        let home_rating = self.store.get(game.home_team).rating;
        let away_rating = self.store.get(game.away_team).rating;
        let (new_home, new_away) = rating::update(home_rating, away_rating, &self.elo, margin);

        self.store
            .record_outcome(game.home_team, game.date, margin, home_score, away_score);
        self.store
            .record_outcome(game.away_team, game.date, -margin, away_score, home_score);

        self.store.get_or_init(game.home_team).rating = new_home;
        self.store.get_or_init(game.away_team).rating = new_away;
    }

    /// Days since the team last played, clamped to [0, 14]; 7.0 for a
    /// team with no prior game. Negative gaps (source data errors) clamp
    /// to 0.
    fn rest_days(&self, team: TeamId, date: NaiveDate) -> f64 {
        match self.store.get(team).last_played {
            Some(last) => ((date - last).num_days() as f64).clamp(REST_MIN, REST_MAX),
            None => REST_DEFAULT,
        }
    }
}

/// Build the labeled training table from a full game log.
///
/// Games are replayed in date order (stable sort, so same-date games
/// keep their input order). Each row is emitted from state accumulated
/// strictly before its game; the outcome is committed only afterwards.
pub fn build_training_table(games: &[GameRecord], config: &FeatureConfig) -> TrainingTable {
    let mut ordered: Vec<&GameRecord> = games.iter().collect();
    ordered.sort_by_key(|g| g.date);

    let mut engine = FeatureEngine::new(config);
    let columns = engine.columns();
    let mut rows = Vec::with_capacity(ordered.len());
    let mut targets = Vec::with_capacity(ordered.len());

    for game in ordered {
        rows.push(engine.snapshot(game.date, game.home_team, game.away_team));
        targets.push(game.margin() as f64);
        engine.advance(game);
    }

    TrainingTable {
        features: FeatureTable { columns, rows },
        targets,
    }
}

/// Build the unlabeled feature table for future matchups.
///
/// A single cursor walks the historical log once; before each matchup is
/// featurized, every game dated strictly before it is committed. A game
/// sharing the matchup's date is NOT consumed: same-day games do not see
/// each other's outcomes.
///
/// Requests may arrive in any order: they are stable-sorted by date
/// internally (the cursor requires monotonic dates) and the output rows
/// are restored to input order.
pub fn build_matchup_table(
    games: &[GameRecord],
    matchups: &[MatchupRequest],
    config: &FeatureConfig,
) -> FeatureTable {
    let mut ordered_games: Vec<&GameRecord> = games.iter().collect();
    ordered_games.sort_by_key(|g| g.date);

    let mut ordered_requests: Vec<(usize, &MatchupRequest)> =
        matchups.iter().enumerate().collect();
    ordered_requests.sort_by_key(|(_, m)| m.date);

    let mut engine = FeatureEngine::new(config);
    let columns = engine.columns();
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); matchups.len()];
    let mut cursor = 0;

    for (original_idx, matchup) in ordered_requests {
        while cursor < ordered_games.len() && ordered_games[cursor].date < matchup.date {
            engine.advance(ordered_games[cursor]);
            cursor += 1;
        }
        rows[original_idx] = engine.snapshot(matchup.date, matchup.home_team, matchup.away_team);
    }

    FeatureTable { columns, rows }
}
