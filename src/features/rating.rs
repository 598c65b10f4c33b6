//! Elo rating updates
//!
//! Incremental paired-comparison ratings with a home-court offset.
//! Feature rows always read the pre-update ratings; updates are applied
//! only after a game's features are recorded.

/// Starting rating for a team's first appearance
pub const INITIAL_RATING: f64 = 1500.0;

/// Elo update parameters
#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    /// Step size: how much ratings move per game
    pub k: f64,
    /// Home advantage in rating points
    pub home_advantage: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            k: 20.0,
            home_advantage: 65.0,
        }
    }
}

/// Expected home win probability, in (0, 1).
///
/// Logistic in the offset rating gap: 1 / (1 + 10^(-(home + adv - away) / 400)).
pub fn expected_home(home_rating: f64, away_rating: f64, home_advantage: f64) -> f64 {
    let gap = (home_rating + home_advantage) - away_rating;
    1.0 / (1.0 + 10.0_f64.powf(-gap / 400.0))
}

/// Post-game ratings for the pair.
///
/// The home side scores 1.0 only on a strict win: a tie (margin == 0)
/// counts as a home loss. This mirrors the upstream data pipeline and is
/// a fixed policy, not an open choice. The update is zero-sum, so
/// `new_home + new_away == home + away` to floating-point precision.
pub fn update(
    home_rating: f64,
    away_rating: f64,
    config: &EloConfig,
    margin: f64,
) -> (f64, f64) {
    let expected = expected_home(home_rating, away_rating, config.home_advantage);
    let actual = if margin > 0.0 { 1.0 } else { 0.0 };

    let new_home = home_rating + config.k * (actual - expected);
    let new_away = away_rating + config.k * ((1.0 - actual) - (1.0 - expected));
    (new_home, new_away)
}
