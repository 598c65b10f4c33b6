//! Per-team accumulated state
//!
//! Histories and ratings advance one game at a time in date order; the
//! builders read state before committing an outcome, never after.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::features::rating::INITIAL_RATING;
use crate::TeamId;

/// Rolling history and rating for a single team
#[derive(Debug, Clone)]
pub struct TeamState {
    /// Signed margins from this team's perspective, oldest first
    pub margins: Vec<f64>,
    /// Points scored, parallel to `margins`
    pub points_for: Vec<f64>,
    /// Points allowed, parallel to `margins`
    pub points_against: Vec<f64>,
    /// Date of the most recent game, if any
    pub last_played: Option<NaiveDate>,
    /// Current Elo rating
    pub rating: f64,
}

impl Default for TeamState {
    fn default() -> Self {
        TeamState {
            margins: Vec::new(),
            points_for: Vec::new(),
            points_against: Vec::new(),
            last_played: None,
            rating: INITIAL_RATING,
        }
    }
}

impl TeamState {
    pub fn games_played(&self) -> usize {
        self.margins.len()
    }
}

/// State for every team seen so far, owned by a single build pass.
///
/// Histories grow unbounded; at the dataset sizes this crate targets
/// (tens of thousands of games) that is cheaper than window trimming.
#[derive(Debug, Default)]
pub struct TeamStateStore {
    states: HashMap<TeamId, TeamState>,
    baseline: TeamState,
}

impl TeamStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a team's state, or the baseline (empty history, initial
    /// rating) for a team never seen
    pub fn get(&self, team: TeamId) -> &TeamState {
        self.states.get(&team).unwrap_or(&self.baseline)
    }

    /// Mutable state for a team, created at baseline on first access
    pub fn get_or_init(&mut self, team: TeamId) -> &mut TeamState {
        self.states.entry(team).or_default()
    }

    /// Append one game's outcome to a team's histories.
    ///
    /// Must be called at most once per team per game, and only after that
    /// game's features have been read.
    pub fn record_outcome(
        &mut self,
        team: TeamId,
        date: NaiveDate,
        margin: f64,
        points_for: f64,
        points_against: f64,
    ) {
        let state = self.get_or_init(team);
        state.margins.push(margin);
        state.points_for.push(points_for);
        state.points_against.push(points_against);
        state.last_played = Some(date);
    }

    pub fn team_count(&self) -> usize {
        self.states.len()
    }
}
